use serde::Serialize;

use super::action::{Action, OwnedAction};
use super::monster::{Monster, MonsterSummary};

/// One instruction-tuning record: one line of the samples file.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSample {
    pub instruction: String,
    pub input: SamplePayload,
    pub output: SamplePayload,
}

/// The typed payloads a sample can carry on either side.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SamplePayload {
    Monster(Box<Monster>),
    Summary(MonsterSummary),
    MonsterActions {
        monster_name: String,
        actions: Vec<Action>,
    },
    OwnedActions(Vec<OwnedAction>),
    AttackScenario(AttackScenario),
    AttackResolution(AttackResolution),
}

/// The weapon or natural attack used in a resolution sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackLine {
    pub name: String,
    pub to_hit: i32,
    pub damage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attacker {
    pub name: String,
    pub attack: AttackLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub name: String,
    pub ac: u32,
    pub hp: u32,
}

/// Flat situational modifiers; the hybrid rules use these in place of
/// advantage and disadvantage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlatModifiers {
    pub cover_bonus: i32,
    pub flanking_bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackScenario {
    pub attacker: Attacker,
    pub target: Target,
    pub modifiers: FlatModifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackResolution {
    pub attack_roll: String,
    pub result: String,
    pub notes: String,
}
