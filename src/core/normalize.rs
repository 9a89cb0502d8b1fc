//! Schema normalizer: maps raw records of any source shape into the
//! canonical Monster and Action schemas.
//!
//! Normalization is pure. The same raw record always yields the same
//! entity, and every nested action goes through the same action rule as a
//! standalone one.

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::loader::RawRecord;
use super::prose;
use crate::schema::action::{Ability, Action, ActionCategory, ActionSpeed, Condition};
use crate::schema::contract::{self, ContractBreach};
use crate::schema::monster::{AbilityScores, Monster};

const DEFAULT_AC: u32 = 10;
const DEFAULT_HP: u32 = 10;
const DEFAULT_SCORE: i32 = 10;

const NAME_KEYS: &[&str] = &["name", "Name"];
const AC_KEYS: &[&str] = &["ac", "armor_class", "armorClass", "Armor Class"];
const HP_KEYS: &[&str] = &["hp", "hit_points", "Hit Points"];
const ABILITY_CONTAINER_KEYS: &[&str] = &["abilities", "ability_scores", "stats"];
const SKILL_KEYS: &[&str] = &["skills", "Skills"];
const SENSE_KEYS: &[&str] = &["senses", "Senses", "sense"];
const ACTION_KEYS: &[&str] = &["actions", "Actions"];

/// Why a record (or a nested action) could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("record is not an object")]
    NotAnObject,
    #[error("record has no name")]
    MissingName,
    #[error("duplicate monster name")]
    DuplicateName,
    #[error("action #{0} is not an object")]
    ActionNotAnObject(usize),
    #[error("action #{0} has no name")]
    ActionMissingName(usize),
    #[error("contract breach: {0}")]
    Contract(ContractBreach),
}

/// A non-fatal normalization failure, collected for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record #{index}{}: {kind}", display_name(.name))]
pub struct SchemaViolation {
    /// Position of the raw record in the source.
    pub index: usize,
    pub name: Option<String>,
    pub kind: ViolationKind,
}

fn display_name(name: &Option<String>) -> String {
    name.as_ref()
        .map(|n| format!(" ('{}')", n))
        .unwrap_or_default()
}

/// A monster plus any nested actions dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMonster {
    pub monster: Monster,
    pub dropped_actions: Vec<ViolationKind>,
}

/// Output of normalizing a whole source.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub monsters: Vec<Monster>,
    pub violations: Vec<SchemaViolation>,
}

impl NormalizedBatch {
    pub fn action_count(&self) -> usize {
        self.monsters.iter().map(|m| m.actions.len()).sum()
    }
}

impl fmt::Display for NormalizedBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} monsters, {} actions, {} violations",
            self.monsters.len(),
            self.action_count(),
            self.violations.len()
        )
    }
}

/// Normalize every record, skipping and recording the ones that fail.
/// Output order follows source order.
pub fn normalize_batch(records: &[RawRecord]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for (index, raw) in records.iter().enumerate() {
        let name = raw_name(raw);
        let mut violation = |kind: ViolationKind, name: Option<String>| {
            let v = SchemaViolation { index, name, kind };
            tracing::warn!(violation = %v, "skipping record");
            batch.violations.push(v);
        };

        let normalized = match normalize_monster(raw) {
            Ok(n) => n,
            Err(kind) => {
                violation(kind, name);
                continue;
            }
        };

        for kind in normalized.dropped_actions {
            violation(kind, name.clone());
        }

        let breaches = contract::check_monster(&normalized.monster);
        if !breaches.is_empty() {
            for breach in breaches {
                violation(ViolationKind::Contract(breach), name.clone());
            }
            continue;
        }

        if !seen.insert(normalized.monster.name.clone()) {
            violation(ViolationKind::DuplicateName, name);
            continue;
        }

        batch.monsters.push(normalized.monster);
    }

    tracing::debug!(%batch, "normalized batch");
    batch
}

/// Normalize one raw monster record.
pub fn normalize_monster(raw: &RawRecord) -> Result<NormalizedMonster, ViolationKind> {
    let obj = raw.as_object().ok_or(ViolationKind::NotAnObject)?;
    let name = string_field(obj, NAME_KEYS).ok_or(ViolationKind::MissingName)?;

    let ac = lookup(obj, AC_KEYS)
        .and_then(armor_class)
        .map(non_negative)
        .unwrap_or(DEFAULT_AC);
    let hp = lookup(obj, HP_KEYS)
        .and_then(first_int)
        .map(non_negative)
        .unwrap_or(DEFAULT_HP);

    let (actions, dropped_actions) = match lookup(obj, ACTION_KEYS) {
        Some(value) => normalize_actions(value),
        None => (Vec::new(), Vec::new()),
    };

    let monster = Monster::new(
        name,
        ac,
        hp,
        ability_scores(obj),
        skills(obj),
        senses(obj),
        actions,
    );

    Ok(NormalizedMonster {
        monster,
        dropped_actions,
    })
}

/// Normalize an actions field: a list of objects, an object keyed by action
/// name, or stat-block prose.
fn normalize_actions(value: &Value) -> (Vec<Action>, Vec<ViolationKind>) {
    let mut actions = Vec::new();
    let mut dropped = Vec::new();

    match value {
        Value::Array(items) => {
            for (pos, item) in items.iter().enumerate() {
                match normalize_action_at(item, pos) {
                    Ok(a) => actions.push(a),
                    Err(kind) => dropped.push(kind),
                }
            }
        }
        Value::Object(by_name) => {
            for (pos, (name, body)) in by_name.iter().enumerate() {
                let mut entry = match body {
                    Value::Object(fields) => fields.clone(),
                    Value::String(text) => {
                        let mut m = Map::new();
                        m.insert("desc".to_string(), Value::String(text.clone()));
                        m
                    }
                    _ => Map::new(),
                };
                entry
                    .entry("name")
                    .or_insert_with(|| Value::String(name.clone()));
                match normalize_action_at(&Value::Object(entry), pos) {
                    Ok(a) => actions.push(a),
                    Err(kind) => dropped.push(kind),
                }
            }
        }
        Value::String(text) => {
            for chunk in prose::split_actions(text) {
                actions.push(action_from_fields(chunk.name, &Map::new(), chunk.description));
            }
        }
        _ => {}
    }

    (actions, dropped)
}

fn normalize_action_at(raw: &Value, pos: usize) -> Result<Action, ViolationKind> {
    match normalize_action(raw) {
        Err(ViolationKind::NotAnObject) => Err(ViolationKind::ActionNotAnObject(pos)),
        Err(ViolationKind::MissingName) => Err(ViolationKind::ActionMissingName(pos)),
        other => other,
    }
}

/// Normalize one raw action record.
pub fn normalize_action(raw: &Value) -> Result<Action, ViolationKind> {
    let obj = raw.as_object().ok_or(ViolationKind::NotAnObject)?;
    let name = string_field(obj, NAME_KEYS).ok_or(ViolationKind::MissingName)?;
    let description = string_field(obj, &["desc", "description", "text"])
        .map(|d| prose::clean(&d))
        .unwrap_or_default();
    Ok(action_from_fields(name, obj, description))
}

/// Explicit fields win; anything missing falls back to scanning the
/// description.
fn action_from_fields(name: String, obj: &Map<String, Value>, description: String) -> Action {
    let to_hit = lookup(obj, &["to_hit", "attack_bonus", "bonus"])
        .and_then(first_int)
        .and_then(|v| i32::try_from(v).ok())
        .or_else(|| prose::to_hit(&description));

    let (damage, listed_type) = explicit_damage(obj);
    let damage = damage.or_else(|| prose::damage(&description));

    let damage_type = lookup(obj, &["damage_type", "damage_type_name"])
        .and_then(named_string)
        .or(listed_type)
        .map(|t| t.to_ascii_lowercase())
        .or_else(|| damage.as_ref().and_then(|_| prose::damage_type(&description)));

    let (dc, save) = match explicit_save(obj).or_else(|| prose::save_dc(&description)) {
        Some((dc, ability)) => (Some(dc), Some(ability)),
        None => (None, None),
    };

    let condition = lookup(obj, &["condition"])
        .and_then(named_string)
        .and_then(|c| Condition::parse(&c))
        .or_else(|| prose::condition(&description));

    let range = lookup(obj, &["range", "reach"])
        .and_then(first_int)
        .map(non_negative)
        .or_else(|| prose::range_feet(&description));

    let category = if to_hit.is_some() {
        ActionCategory::Attack
    } else if dc.is_some() {
        ActionCategory::Save
    } else if prose::mentions_spell(&name) || prose::mentions_spell(&description) {
        ActionCategory::Spell
    } else if damage.is_some() {
        ActionCategory::Attack
    } else {
        ActionCategory::Utility
    };

    let action_type = lookup(obj, &["action_type"])
        .and_then(Value::as_str)
        .and_then(ActionSpeed::parse)
        .unwrap_or_else(|| infer_speed(&name, &description));

    // Attacks never carry a save; the rider stays in the description.
    let (dc, save) = if category == ActionCategory::Attack {
        (None, None)
    } else {
        (dc, save)
    };

    Action {
        name,
        category,
        action_type,
        to_hit,
        dc,
        save,
        damage,
        damage_type,
        condition,
        range,
        description,
    }
}

fn infer_speed(name: &str, description: &str) -> ActionSpeed {
    let name_lower = name.to_ascii_lowercase();
    let text = format!("{} {}", name_lower, description.to_ascii_lowercase());
    if text.contains("bonus action") {
        ActionSpeed::Quick
    } else if text.contains("reaction") {
        ActionSpeed::Immediate
    } else if name_lower == "move" || name_lower == "movement" {
        ActionSpeed::Move
    } else {
        ActionSpeed::Standard
    }
}

/// Damage from `damage_dice`/`damage_bonus`, or a `damage` string, object,
/// or 5e-API list. The second value is a damage type carried by the list
/// form.
fn explicit_damage(obj: &Map<String, Value>) -> (Option<String>, Option<String>) {
    if let Some(dice) = lookup(obj, &["damage_dice"]).and_then(Value::as_str) {
        let bonus = lookup(obj, &["damage_bonus"]).and_then(first_int).unwrap_or(0);
        return (prose::dice_with_bonus(dice, bonus), None);
    }

    match lookup(obj, &["damage"]) {
        Some(Value::String(s)) => (prose::canonical_dice(s), None),
        Some(Value::Number(n)) => (prose::canonical_dice(&n.to_string()), None),
        Some(Value::Object(part)) => (damage_part(part), None),
        Some(Value::Array(parts)) => match parts.first() {
            Some(Value::Object(part)) => (
                damage_part(part),
                lookup(part, &["damage_type"]).and_then(named_string),
            ),
            Some(Value::String(s)) => (prose::canonical_dice(s), None),
            _ => (None, None),
        },
        _ => (None, None),
    }
}

fn damage_part(part: &Map<String, Value>) -> Option<String> {
    let dice = lookup(part, &["damage_dice", "dice", "damage"]).and_then(Value::as_str)?;
    let bonus = lookup(part, &["damage_bonus", "bonus"])
        .and_then(first_int)
        .unwrap_or(0);
    prose::dice_with_bonus(dice, bonus)
}

/// A 5e-API `dc` object, or a flat `dc` paired with a save field. Both the
/// DC and the ability must be present.
fn explicit_save(obj: &Map<String, Value>) -> Option<(u32, Ability)> {
    match lookup(obj, &["dc"])? {
        Value::Object(dc) => {
            let value = lookup(dc, &["dc_value", "value"]).and_then(first_int)?;
            let ability = lookup(dc, &["dc_type", "type"])
                .and_then(named_string)
                .and_then(|a| Ability::parse(&a))?;
            Some((non_negative(value), ability))
        }
        other => {
            let value = first_int(other)?;
            let ability = lookup(obj, &["save", "dc_type", "save_type"])
                .and_then(named_string)
                .and_then(|a| Ability::parse(&a))?;
            Some((non_negative(value), ability))
        }
    }
}

fn armor_class(value: &Value) -> Option<i64> {
    match value {
        Value::Array(items) => items.first().and_then(armor_class),
        Value::Object(entry) => lookup(entry, &["value", "ac"]).and_then(first_int),
        other => first_int(other),
    }
}

fn ability_scores(obj: &Map<String, Value>) -> AbilityScores {
    let container = lookup(obj, ABILITY_CONTAINER_KEYS).and_then(Value::as_object);
    let mut scores = AbilityScores::default();

    for ability in Ability::ALL {
        let code = ability.code();
        let lower = code.to_ascii_lowercase();
        let full = ability.full_name();
        let title = title_case(full);
        let aliases = [code, lower.as_str(), full, title.as_str()];

        let score = container
            .and_then(|c| lookup(c, &aliases))
            .or_else(|| lookup(obj, &aliases))
            .and_then(first_int)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(DEFAULT_SCORE);
        scores.set(ability, score);
    }

    scores
}

fn skills(obj: &Map<String, Value>) -> BTreeMap<String, i32> {
    let mut out = BTreeMap::new();

    match lookup(obj, SKILL_KEYS) {
        Some(Value::Object(map)) => {
            for (skill, bonus) in map {
                let bonus = first_int(bonus)
                    .and_then(|v| i32::try_from(v).ok())
                    .unwrap_or(0);
                out.insert(skill.clone(), bonus);
            }
        }
        Some(Value::String(text)) => out.extend(prose::skills(text)),
        _ => {}
    }

    // 5e-API records list skills as proficiencies named "Skill: Stealth".
    if out.is_empty() {
        if let Some(Value::Array(profs)) = lookup(obj, &["proficiencies"]) {
            for prof in profs.iter().filter_map(Value::as_object) {
                let skill = prof
                    .get("proficiency")
                    .and_then(named_string)
                    .and_then(|n| n.strip_prefix("Skill: ").map(str::to_string));
                let bonus = prof
                    .get("value")
                    .and_then(first_int)
                    .and_then(|v| i32::try_from(v).ok());
                if let (Some(skill), Some(bonus)) = (skill, bonus) {
                    out.insert(skill, bonus);
                }
            }
        }
    }

    out
}

fn senses(obj: &Map<String, Value>) -> String {
    match lookup(obj, SENSE_KEYS) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{} {}", k, s),
                other => format!("{} {}", k, other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// First alias present with a non-null value.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// First non-blank string under any alias.
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// A plain string, or an object's `name` (5e-API references).
fn named_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => string_field(obj, &["name", "index"]),
        _ => None,
    }
}

/// First integer a value carries: numbers directly, strings via their first
/// digit run, lists via their first element.
fn first_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => prose::first_int(s),
        Value::Array(items) => items.first().and_then(first_int),
        _ => None,
    }
}

fn non_negative(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn raw_name(raw: &RawRecord) -> Option<String> {
    raw.as_object().and_then(|o| string_field(o, NAME_KEYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_style_monster_normalizes() {
        let raw = json!({
            "name": "Goblin",
            "armor_class": [{"type": "armor", "value": 15}],
            "hit_points": 7,
            "strength": 8,
            "dexterity": 14,
            "senses": {"darkvision": "60 ft.", "passive_perception": 9},
            "proficiencies": [
                {"value": 6, "proficiency": {"index": "skill-stealth", "name": "Skill: Stealth"}}
            ],
            "actions": [{
                "name": "Scimitar",
                "attack_bonus": 4,
                "desc": "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage.",
                "damage": [{"damage_type": {"name": "Slashing"}, "damage_dice": "1d6+2"}]
            }]
        });

        let n = normalize_monster(&raw).unwrap();
        let m = n.monster;
        assert_eq!(m.ac, 15);
        assert_eq!((m.hp, m.max_hp), (7, 7));
        assert_eq!(m.abilities.strength, 8);
        assert_eq!(m.abilities.dexterity, 14);
        assert_eq!(m.abilities.wisdom, DEFAULT_SCORE);
        assert_eq!(m.skills.get("Stealth"), Some(&6));
        assert_eq!(m.senses, "darkvision 60 ft., passive_perception 9");

        let a = &m.actions[0];
        assert_eq!(a.category, ActionCategory::Attack);
        assert_eq!(a.to_hit, Some(4));
        assert_eq!(a.damage.as_deref(), Some("1d6+2"));
        assert_eq!(a.damage_type.as_deref(), Some("slashing"));
        assert_eq!(a.range, Some(5));
        assert_eq!(m.actions, m.attacks);
    }

    #[test]
    fn text_style_monster_normalizes() {
        let raw = json!({
            "Name": "Wolf",
            "Armor Class": "13 (natural armor)",
            "Hit Points": "11 (2d8 + 2)",
            "STR": "12 (+1)",
            "Skills": "Perception +3, Stealth +4",
            "Senses": "passive Perception 13",
            "Actions": "Bite. Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 7 (2d4 + 2) piercing damage. If the target is a creature, it must succeed on a DC 11 Strength saving throw or be knocked prone."
        });

        let m = normalize_monster(&raw).unwrap().monster;
        assert_eq!(m.name, "Wolf");
        assert_eq!(m.ac, 13);
        assert_eq!(m.hp, 11);
        assert_eq!(m.abilities.strength, 12);
        assert_eq!(m.skills.len(), 2);
        assert_eq!(m.senses, "passive Perception 13");

        let bite = &m.actions[0];
        assert_eq!(bite.name, "Bite");
        assert_eq!(bite.category, ActionCategory::Attack);
        assert_eq!(bite.to_hit, Some(4));
        assert_eq!(bite.damage.as_deref(), Some("2d4+2"));
        assert_eq!(bite.condition, Some(Condition::Prone));
        assert_eq!(bite.dc, None);
        assert_eq!(bite.save, None);
    }

    #[test]
    fn missing_name_is_violation() {
        let raw = json!({"ac": 12, "hp": 4});
        assert_eq!(normalize_monster(&raw), Err(ViolationKind::MissingName));
        assert_eq!(
            normalize_monster(&json!({"name": "   "})),
            Err(ViolationKind::MissingName)
        );
    }

    #[test]
    fn non_object_is_violation() {
        assert_eq!(normalize_monster(&json!("Goblin")), Err(ViolationKind::NotAnObject));
    }

    #[test]
    fn defaults_apply_when_stats_missing() {
        let m = normalize_monster(&json!({"name": "Blob"})).unwrap().monster;
        assert_eq!(m.ac, DEFAULT_AC);
        assert_eq!(m.hp, DEFAULT_HP);
        assert_eq!(m.abilities, AbilityScores::default());
        assert!(m.skills.is_empty());
        assert_eq!(m.senses, "");
        assert!(m.actions.is_empty());
    }

    #[test]
    fn save_action_has_no_to_hit() {
        let raw = json!({
            "name": "Fire Breath",
            "desc": "The dragon exhales fire in a 15-foot cone.",
            "dc": {"dc_type": {"name": "DEX"}, "dc_value": 13},
            "damage": [{"damage_dice": "6d6", "damage_type": {"name": "Fire"}}]
        });
        let a = normalize_action(&raw).unwrap();
        assert_eq!(a.category, ActionCategory::Save);
        assert_eq!(a.to_hit, None);
        assert_eq!(a.dc, Some(13));
        assert_eq!(a.save, Some(Ability::Dexterity));
        assert_eq!(a.damage.as_deref(), Some("6d6"));
        assert_eq!(a.damage_type.as_deref(), Some("fire"));
    }

    #[test]
    fn absent_damage_stays_absent() {
        let a = normalize_action(&json!({"name": "Dash", "desc": "Moves quickly."})).unwrap();
        assert_eq!(a.category, ActionCategory::Utility);
        assert_eq!(a.damage, None);
        assert_eq!(a.damage_type, None);
        assert_eq!(a.to_hit, None);
    }

    #[test]
    fn zero_to_hit_is_kept() {
        let a = normalize_action(&json!({"name": "Slam", "to_hit": 0})).unwrap();
        assert_eq!(a.to_hit, Some(0));
        assert_eq!(a.category, ActionCategory::Attack);
    }

    #[test]
    fn damage_dice_and_bonus_compose() {
        let a = normalize_action(&json!({
            "name": "Club", "attack_bonus": "+2", "damage_dice": "1d4", "damage_bonus": -1
        }))
        .unwrap();
        assert_eq!(a.to_hit, Some(2));
        assert_eq!(a.damage.as_deref(), Some("1d4-1"));
    }

    #[test]
    fn spellcasting_is_spell() {
        let a = normalize_action(&json!({
            "name": "Spellcasting",
            "desc": "The mage casts one of the following spells."
        }))
        .unwrap();
        assert_eq!(a.category, ActionCategory::Spell);
    }

    #[test]
    fn speed_inference() {
        let parry = normalize_action(&json!({
            "name": "Parry",
            "desc": "As a reaction, the knight adds 2 to its AC."
        }))
        .unwrap();
        assert_eq!(parry.action_type, ActionSpeed::Immediate);

        let nimble = normalize_action(&json!({
            "name": "Nimble Escape",
            "desc": "Disengage or Hide as a bonus action."
        }))
        .unwrap();
        assert_eq!(nimble.action_type, ActionSpeed::Quick);

        let explicit = normalize_action(&json!({"name": "Step", "action_type": "move"})).unwrap();
        assert_eq!(explicit.action_type, ActionSpeed::Move);
    }

    #[test]
    fn actions_keyed_by_name() {
        let raw = json!({
            "name": "Imp",
            "actions": {"Sting": {"to_hit": 5, "damage": "1d4 + 3"}}
        });
        let m = normalize_monster(&raw).unwrap().monster;
        assert_eq!(m.actions[0].name, "Sting");
        assert_eq!(m.actions[0].damage.as_deref(), Some("1d4+3"));
    }

    #[test]
    fn keyed_actions_and_senses_keep_source_order() {
        let raw: Value = serde_json::from_str(
            r#"{
                "name": "Imp",
                "senses": {"truesight": "120 ft.", "darkvision": "60 ft."},
                "actions": {"Sting": {"to_hit": 5}, "Bite": {"to_hit": 4}, "Invisibility": "The imp turns invisible."}
            }"#,
        )
        .unwrap();
        let m = normalize_monster(&raw).unwrap().monster;
        let names: Vec<&str> = m.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Sting", "Bite", "Invisibility"]);
        assert_eq!(m.senses, "truesight 120 ft., darkvision 60 ft.");
    }

    #[test]
    fn nameless_nested_action_is_dropped_not_fatal() {
        let raw = json!({
            "name": "Orc",
            "actions": [{"to_hit": 5}, {"name": "Greataxe", "to_hit": 5}, "junk"]
        });
        let n = normalize_monster(&raw).unwrap();
        assert_eq!(n.monster.actions.len(), 1);
        assert_eq!(
            n.dropped_actions,
            vec![
                ViolationKind::ActionMissingName(0),
                ViolationKind::ActionNotAnObject(2)
            ]
        );
    }

    #[test]
    fn batch_skips_bad_records_and_duplicates() {
        let records = vec![
            json!({"name": "Goblin"}),
            json!({"hp": 3}),
            json!({"name": "Goblin"}),
            json!({"name": "Wolf"}),
        ];
        let batch = normalize_batch(&records);
        let names: Vec<&str> = batch.monsters.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin", "Wolf"]);
        assert_eq!(batch.violations.len(), 2);
        assert_eq!(batch.violations[0].index, 1);
        assert_eq!(batch.violations[0].kind, ViolationKind::MissingName);
        assert_eq!(batch.violations[1].kind, ViolationKind::DuplicateName);
        assert_eq!(
            batch.violations[1].to_string(),
            "record #2 ('Goblin'): duplicate monster name"
        );
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = json!({"name": "Ogre", "Actions": "Greatclub. Melee Weapon Attack: +6 to hit, reach 5 ft. Hit: 13 (2d8 + 4) bludgeoning damage."});
        assert_eq!(normalize_monster(&raw), normalize_monster(&raw));
    }
}
