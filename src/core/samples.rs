//! Instruction-tuning samples derived from the normalized corpus.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::rules::HouseRules;
use crate::schema::action::{Ability, OwnedAction};
use crate::schema::monster::{Monster, MonsterSummary};
use crate::schema::sample::{
    AttackLine, AttackResolution, AttackScenario, Attacker, FlatModifiers, SamplePayload, Target,
    TrainingSample,
};

pub const NORMALIZE_INSTRUCTION: &str = "Normalize this SRD monster into the canonical schema.";
pub const EXTRACT_INSTRUCTION: &str =
    "Extract actions from this monster into ACTION_SCHEMA format.";
pub const RESOLVE_INSTRUCTION: &str = "Given attacker and target, resolve an attack roll and damage using hybrid rules (no advantage/disadvantage, use flat modifiers).";

const UNARMED_PROFICIENCY: i32 = 2;
const MIN_UNARMED_DAMAGE: i32 = 1;

/// Every action in monster-then-action order, tagged with its owner.
pub fn owned_actions(monsters: &[Monster]) -> Vec<OwnedAction> {
    monsters
        .iter()
        .flat_map(|m| {
            m.actions.iter().map(move |a| OwnedAction {
                monster_name: m.name.clone(),
                action: a.clone(),
            })
        })
        .collect()
}

/// Build the sample set. Deterministic for a given corpus, rules and seed:
/// one normalize sample per monster, one extract sample per monster with
/// actions, then a single attack-resolution sample when the corpus has at
/// least two monsters.
pub fn generate_samples(monsters: &[Monster], rules: &HouseRules, seed: u64) -> Vec<TrainingSample> {
    let mut samples = Vec::with_capacity(monsters.len() * 2 + 1);

    for monster in monsters {
        samples.push(TrainingSample {
            instruction: NORMALIZE_INSTRUCTION.to_string(),
            input: SamplePayload::Summary(MonsterSummary::from(monster)),
            output: SamplePayload::Monster(Box::new(monster.clone())),
        });
    }

    for monster in monsters.iter().filter(|m| !m.actions.is_empty()) {
        samples.push(TrainingSample {
            instruction: EXTRACT_INSTRUCTION.to_string(),
            input: SamplePayload::MonsterActions {
                monster_name: monster.name.clone(),
                actions: monster.actions.clone(),
            },
            output: SamplePayload::OwnedActions(owned_actions(std::slice::from_ref(monster))),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    if let Some(scenario) = attack_scenario(monsters, rules, &mut rng) {
        let resolution = resolve(&scenario, rules);
        samples.push(TrainingSample {
            instruction: RESOLVE_INSTRUCTION.to_string(),
            input: SamplePayload::AttackScenario(scenario),
            output: SamplePayload::AttackResolution(resolution),
        });
    }

    samples
}

fn attack_scenario(
    monsters: &[Monster],
    rules: &HouseRules,
    rng: &mut StdRng,
) -> Option<AttackScenario> {
    // A monster never attacks itself.
    let len = monsters.len();
    if len < 2 {
        return None;
    }

    let attacker_idx = rng.gen_range(0..len);
    let target_idx = (attacker_idx + 1 + rng.gen_range(0..len - 1)) % len;
    let attacker = &monsters[attacker_idx];
    let target = &monsters[target_idx];

    let cover_bonus = rng.gen_range(rules.cover_bonuses());

    Some(AttackScenario {
        attacker: Attacker {
            name: attacker.name.clone(),
            attack: attack_line(attacker),
        },
        target: Target {
            name: target.name.clone(),
            ac: target.ac,
            hp: target.hp,
        },
        modifiers: FlatModifiers {
            cover_bonus,
            flanking_bonus: 0,
        },
    })
}

/// The monster's primary attack, or an unarmed strike dealing a flat
/// `1 + STR` damage, never less than 1.
fn attack_line(monster: &Monster) -> AttackLine {
    if let Some(action) = monster.primary_attack() {
        if let (Some(to_hit), Some(damage)) = (action.to_hit, action.damage.as_ref()) {
            return AttackLine {
                name: action.name.clone(),
                to_hit,
                damage: damage.clone(),
            };
        }
    }

    let str_mod = monster.modifier(Ability::Strength);
    AttackLine {
        name: "Unarmed Strike".to_string(),
        to_hit: str_mod + UNARMED_PROFICIENCY,
        damage: (1 + str_mod).max(MIN_UNARMED_DAMAGE).to_string(),
    }
}

fn resolve(scenario: &AttackScenario, rules: &HouseRules) -> AttackResolution {
    let attack = &scenario.attacker.attack;
    let mods = scenario.modifiers;
    let target_ac = i64::from(scenario.target.ac);
    let target_number = target_ac + i64::from(mods.cover_bonus);

    AttackResolution {
        attack_roll: format!(
            "d20 + {} + {} (modifiers) vs AC {} ({} + {} cover)",
            attack.to_hit, mods.flanking_bonus, target_number, target_ac, mods.cover_bonus
        ),
        result: format!(
            "If roll >= {}: Hit. Roll {} damage.",
            target_number, attack.damage
        ),
        notes: format!(
            "Hybrid rules: flat {:+} AC for cover instead of advantage/disadvantage; permitted modifiers [{}, {}].",
            mods.cover_bonus,
            rules.min_modifier(),
            rules.max_modifier()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::action::{Action, ActionCategory, ActionSpeed};
    use crate::schema::monster::AbilityScores;
    use std::collections::BTreeMap;

    fn scimitar() -> Action {
        Action {
            name: "Scimitar".to_string(),
            category: ActionCategory::Attack,
            action_type: ActionSpeed::Standard,
            to_hit: Some(4),
            dc: None,
            save: None,
            damage: Some("1d6+2".to_string()),
            damage_type: Some("slashing".to_string()),
            condition: None,
            range: Some(5),
            description: String::new(),
        }
    }

    fn monster(name: &str, actions: Vec<Action>) -> Monster {
        Monster::new(
            name.to_string(),
            15,
            7,
            AbilityScores::default(),
            BTreeMap::new(),
            String::new(),
            actions,
        )
    }

    #[test]
    fn sample_counts_follow_corpus() {
        let monsters = vec![monster("Goblin", vec![scimitar()]), monster("Slime", Vec::new())];
        let samples = generate_samples(&monsters, &HouseRules::default(), 42);
        // two normalize, one extract, one resolve
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].instruction, NORMALIZE_INSTRUCTION);
        assert_eq!(samples[2].instruction, EXTRACT_INSTRUCTION);
        assert_eq!(samples[3].instruction, RESOLVE_INSTRUCTION);
    }

    #[test]
    fn no_monsters_no_samples() {
        assert!(generate_samples(&[], &HouseRules::default(), 1).is_empty());
    }

    #[test]
    fn same_seed_same_samples() {
        let monsters = vec![
            monster("Goblin", vec![scimitar()]),
            monster("Orc", Vec::new()),
            monster("Wolf", Vec::new()),
        ];
        let a = serde_json::to_string(&generate_samples(&monsters, &HouseRules::default(), 9)).unwrap();
        let b = serde_json::to_string(&generate_samples(&monsters, &HouseRules::default(), 9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn attacker_and_target_differ() {
        let monsters = vec![monster("Goblin", vec![scimitar()]), monster("Orc", Vec::new())];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = attack_scenario(&monsters, &HouseRules::default(), &mut rng).unwrap();
            assert_ne!(s.attacker.name, s.target.name);
            assert!((0..=2).contains(&s.modifiers.cover_bonus));
        }
    }

    #[test]
    fn cover_respects_narrow_range() {
        let rules = HouseRules::new(None, (0, 0), None).unwrap();
        let monsters = vec![monster("Goblin", vec![scimitar()]), monster("Orc", Vec::new())];
        let mut rng = StdRng::seed_from_u64(3);
        let s = attack_scenario(&monsters, &rules, &mut rng).unwrap();
        assert_eq!(s.modifiers.cover_bonus, 0);
    }

    #[test]
    fn unarmed_fallback_without_attacks() {
        let line = attack_line(&monster("Slime", Vec::new()));
        assert_eq!(line.name, "Unarmed Strike");
        assert_eq!(line.to_hit, 2);
        assert_eq!(line.damage, "1");
    }

    #[test]
    fn weak_unarmed_strike_still_deals_damage() {
        let mut weakling = monster("Weakling", Vec::new());
        weakling.abilities.set(Ability::Strength, 8);
        let line = attack_line(&weakling);
        assert_eq!(line.to_hit, 1);
        assert_eq!(line.damage, "1");

        let mut brute = monster("Brute", Vec::new());
        brute.abilities.set(Ability::Strength, 16);
        assert_eq!(attack_line(&brute).damage, "4");
    }

    #[test]
    fn single_monster_gets_no_resolution_sample() {
        let monsters = vec![monster("Weakling", vec![scimitar()])];
        let samples = generate_samples(&monsters, &HouseRules::default(), 42);
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.instruction != RESOLVE_INSTRUCTION));
    }

    #[test]
    fn resolution_targets_ac_plus_cover() {
        let scenario = AttackScenario {
            attacker: Attacker {
                name: "Fighter".to_string(),
                attack: AttackLine {
                    name: "Longsword".to_string(),
                    to_hit: 5,
                    damage: "1d8+3".to_string(),
                },
            },
            target: Target {
                name: "Goblin".to_string(),
                ac: 15,
                hp: 7,
            },
            modifiers: FlatModifiers {
                cover_bonus: 2,
                flanking_bonus: 0,
            },
        };
        let r = resolve(&scenario, &HouseRules::default());
        assert_eq!(r.attack_roll, "d20 + 5 + 0 (modifiers) vs AC 17 (15 + 2 cover)");
        assert_eq!(r.result, "If roll >= 17: Hit. Roll 1d8+3 damage.");
        assert!(r.notes.contains("flat +2 AC"));
    }

    #[test]
    fn owned_actions_keep_traversal_order() {
        let mut bite = scimitar();
        bite.name = "Bite".to_string();
        let monsters = vec![
            monster("Goblin", vec![scimitar()]),
            monster("Wolf", vec![bite]),
        ];
        let owned = owned_actions(&monsters);
        let pairs: Vec<(&str, &str)> = owned
            .iter()
            .map(|o| (o.monster_name.as_str(), o.action.name.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Goblin", "Scimitar"), ("Wolf", "Bite")]);
    }
}
