use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::action::{Ability, Action};

/// The six ability scores, serialized under their three-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "STR")]
    pub strength: i32,
    #[serde(rename = "DEX")]
    pub dexterity: i32,
    #[serde(rename = "CON")]
    pub constitution: i32,
    #[serde(rename = "INT")]
    pub intelligence: i32,
    #[serde(rename = "WIS")]
    pub wisdom: i32,
    #[serde(rename = "CHA")]
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, score: i32) {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
    }
}

/// A normalized monster stat block.
///
/// `actions` and `attacks` are two views over the same entries. Older
/// consumers read `attacks`, newer ones read `actions`; both are always
/// written so neither breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub ac: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub abilities: AbilityScores,
    pub skills: BTreeMap<String, i32>,
    pub senses: String,
    pub actions: Vec<Action>,
    pub attacks: Vec<Action>,
}

impl Monster {
    /// Build a monster at full health with both action views populated.
    pub fn new(
        name: String,
        ac: u32,
        max_hp: u32,
        abilities: AbilityScores,
        skills: BTreeMap<String, i32>,
        senses: String,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            name,
            ac,
            hp: max_hp,
            max_hp,
            abilities,
            skills,
            senses,
            attacks: actions.clone(),
            actions,
        }
    }

    /// The first action that resolves with an attack roll and deals damage.
    pub fn primary_attack(&self) -> Option<&Action> {
        self.actions
            .iter()
            .find(|a| a.is_attack() && a.to_hit.is_some() && a.damage.is_some())
    }

    /// Standard ability modifier: `(score - 10) / 2`, rounded down.
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.abilities.get(ability) - 10).div_euclid(2)
    }
}

/// The compact monster view used as training-sample input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSummary {
    pub name: String,
    pub ac: u32,
    pub hp: u32,
    pub abilities: AbilityScores,
}

impl From<&Monster> for MonsterSummary {
    fn from(monster: &Monster) -> Self {
        Self {
            name: monster.name.clone(),
            ac: monster.ac,
            hp: monster.hp,
            abilities: monster.abilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mirrors_actions_into_attacks() {
        let monster = Monster::new(
            "Goblin".to_string(),
            15,
            7,
            AbilityScores::default(),
            BTreeMap::new(),
            String::new(),
            Vec::new(),
        );
        assert_eq!(monster.hp, monster.max_hp);
        assert_eq!(monster.actions, monster.attacks);
        assert!(monster.primary_attack().is_none());
    }

    #[test]
    fn modifier_rounds_down() {
        let mut scores = AbilityScores::default();
        scores.set(Ability::Strength, 9);
        scores.set(Ability::Dexterity, 15);
        let monster = Monster::new(
            "Kobold".to_string(),
            12,
            5,
            scores,
            BTreeMap::new(),
            String::new(),
            Vec::new(),
        );
        assert_eq!(monster.modifier(Ability::Strength), -1);
        assert_eq!(monster.modifier(Ability::Dexterity), 2);
        assert_eq!(monster.modifier(Ability::Wisdom), 0);
    }

    #[test]
    fn ability_scores_serialize_in_fixed_order() {
        let json = serde_json::to_string(&AbilityScores::default()).unwrap();
        assert_eq!(
            json,
            r#"{"STR":10,"DEX":10,"CON":10,"INT":10,"WIS":10,"CHA":10}"#
        );
    }

    #[test]
    fn set_and_get_round_trip_per_ability() {
        let mut scores = AbilityScores::default();
        for (i, ability) in Ability::ALL.into_iter().enumerate() {
            scores.set(ability, i as i32);
        }
        assert_eq!(scores.get(Ability::Strength), 0);
        assert_eq!(scores.get(Ability::Charisma), 5);
    }
}
