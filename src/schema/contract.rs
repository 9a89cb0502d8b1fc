//! Consistency contract: the invariants both the corpus and the interactive
//! application rely on when they read Monster and Action records.

use thiserror::Error;

use super::action::{Action, ActionCategory};
use super::monster::Monster;
use crate::core::rules::HouseRules;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractBreach {
    #[error("monster has an empty name")]
    EmptyMonsterName,
    #[error("monster '{monster}' has hp {hp} above max_hp {max_hp}")]
    HpAboveMax { monster: String, hp: u32, max_hp: u32 },
    #[error("monster '{0}' has diverging actions/attacks lists")]
    ActionViewsDiverge(String),
    #[error("action in '{monster}' has an empty name")]
    EmptyActionName { monster: String },
    #[error("attack '{action}' carries a save DC")]
    AttackWithSave { action: String },
    #[error("save '{action}' carries a to-hit bonus")]
    SaveWithToHit { action: String },
    #[error("action '{action}' has dc and save out of step")]
    UnpairedSave { action: String },
    #[error("rules snapshot allows advantage/disadvantage")]
    AdvantageEnabled,
    #[error("flat modifier range [{min}, {max}] does not straddle zero")]
    ModifierRange { min: i32, max: i32 },
}

/// Category field-exclusivity checks for a single action.
pub fn check_action(action: &Action) -> Vec<ContractBreach> {
    let mut breaches = Vec::new();
    let name = || action.name.clone();

    match action.category {
        ActionCategory::Attack if action.dc.is_some() || action.save.is_some() => {
            breaches.push(ContractBreach::AttackWithSave { action: name() });
        }
        ActionCategory::Save if action.to_hit.is_some() => {
            breaches.push(ContractBreach::SaveWithToHit { action: name() });
        }
        _ => {}
    }

    if action.dc.is_some() != action.save.is_some() {
        breaches.push(ContractBreach::UnpairedSave { action: name() });
    }

    breaches
}

pub fn check_monster(monster: &Monster) -> Vec<ContractBreach> {
    let mut breaches = Vec::new();

    if monster.name.trim().is_empty() {
        breaches.push(ContractBreach::EmptyMonsterName);
    }
    if monster.hp > monster.max_hp {
        breaches.push(ContractBreach::HpAboveMax {
            monster: monster.name.clone(),
            hp: monster.hp,
            max_hp: monster.max_hp,
        });
    }
    if monster.actions != monster.attacks {
        breaches.push(ContractBreach::ActionViewsDiverge(monster.name.clone()));
    }

    for action in &monster.actions {
        if action.name.trim().is_empty() {
            breaches.push(ContractBreach::EmptyActionName {
                monster: monster.name.clone(),
            });
        }
        breaches.extend(check_action(action));
    }

    breaches
}

pub fn check_rules(rules: &HouseRules) -> Vec<ContractBreach> {
    let mut breaches = Vec::new();
    if !rules.no_advantage_disadvantage {
        breaches.push(ContractBreach::AdvantageEnabled);
    }
    let (min, max) = rules.flat_modifier_range;
    if min > 0 || max < 0 {
        breaches.push(ContractBreach::ModifierRange { min, max });
    }
    breaches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::action::{Ability, ActionSpeed};
    use crate::schema::monster::AbilityScores;
    use std::collections::BTreeMap;

    fn action(category: ActionCategory) -> Action {
        Action {
            name: "Breath".to_string(),
            category,
            action_type: ActionSpeed::Standard,
            to_hit: None,
            dc: None,
            save: None,
            damage: None,
            damage_type: None,
            condition: None,
            range: None,
            description: String::new(),
        }
    }

    #[test]
    fn save_with_to_hit_is_flagged() {
        let mut a = action(ActionCategory::Save);
        a.dc = Some(13);
        a.save = Some(Ability::Dexterity);
        a.to_hit = Some(5);
        assert_eq!(
            check_action(&a),
            vec![ContractBreach::SaveWithToHit {
                action: "Breath".to_string()
            }]
        );
    }

    #[test]
    fn attack_with_dc_is_flagged() {
        let mut a = action(ActionCategory::Attack);
        a.to_hit = Some(4);
        a.dc = Some(11);
        let breaches = check_action(&a);
        assert!(breaches.contains(&ContractBreach::AttackWithSave {
            action: "Breath".to_string()
        }));
        assert!(breaches.contains(&ContractBreach::UnpairedSave {
            action: "Breath".to_string()
        }));
    }

    #[test]
    fn diverging_views_are_flagged() {
        let mut monster = Monster::new(
            "Ogre".to_string(),
            11,
            59,
            AbilityScores::default(),
            BTreeMap::new(),
            String::new(),
            vec![action(ActionCategory::Utility)],
        );
        assert!(check_monster(&monster).is_empty());

        monster.attacks.clear();
        assert_eq!(
            check_monster(&monster),
            vec![ContractBreach::ActionViewsDiverge("Ogre".to_string())]
        );
    }

    #[test]
    fn default_rules_hold() {
        assert!(check_rules(&HouseRules::default()).is_empty());
    }
}
