//! Free-text scanning for SRD action prose: chunking stat-block text into
//! named actions and pulling mechanical values out of descriptions.

use regex::Regex;
use std::sync::LazyLock;

use crate::schema::action::{Ability, Condition};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Za-z0-9'’\- ]*?)\s*(\([^)]*\))?$").expect("valid regex")
});
static FIRST_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+").expect("valid regex"));
static TO_HIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([+-]\d+)\s*to hit").expect("valid regex"));
static DICE_IN_PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+d\d+\s*(?:[+-]\s*\d+)?)\)").expect("valid regex")
});
static DICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:d\d+)?(?:[+-]\d+)?$").expect("valid regex"));
static DAMAGE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(acid|bludgeoning|cold|fire|force|lightning|necrotic|piercing|poison|psychic|radiant|slashing|thunder)\s+damage",
    )
    .expect("valid regex")
});
static SAVE_DC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)DC\s*(\d+)\s+(STR|DEX|CON|INT|WIS|CHA|Strength|Dexterity|Constitution|Intelligence|Wisdom|Charisma)\b",
    )
    .expect("valid regex")
});
static REACH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)reach\s*(\d+)\s*ft").expect("valid regex"));
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)range\s*(\d+)").expect("valid regex"));
static SPELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bspell(?:s|casting)?\b").expect("valid regex"));
static SKILL_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*([+-]\d+)\s*$").expect("valid regex"));

/// Headings longer than this are treated as ordinary sentences.
const MAX_HEADING_WORDS: usize = 4;

/// Lowercase words allowed inside a title-case heading.
const HEADING_SMALL_WORDS: &[&str] = &["of", "and", "the", "a", "an", "in", "on", "or", "with"];

/// A named action cut out of stat-block prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProseAction {
    pub name: String,
    pub description: String,
}

/// Remove markup and collapse runs of whitespace.
pub fn clean(text: &str) -> String {
    let stripped = HTML_TAG.replace_all(text, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Split on sentence-ending periods: a `.` followed by whitespace or the end
/// of input. Periods inside tokens like `ft.,` do not split.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    for (i, b) in bytes.iter().enumerate() {
        if *b != b'.' {
            continue;
        }
        let at_end = i + 1 == bytes.len();
        if at_end || bytes[i + 1].is_ascii_whitespace() {
            let sentence = text[start..=i].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = i + 1;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

fn heading(sentence: &str) -> Option<String> {
    let body = sentence.strip_suffix('.')?;
    let caps = HEADING.captures(body)?;
    let name = caps.get(1)?.as_str().trim();
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_HEADING_WORDS {
        return None;
    }
    let title_case = words.iter().all(|w| {
        w.starts_with(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit())
            || HEADING_SMALL_WORDS.contains(w)
    });
    if !title_case {
        return None;
    }
    Some(body.trim().to_string())
}

/// Chunk an SRD "Actions" text field into named actions. Text before the
/// first heading is dropped.
pub fn split_actions(text: &str) -> Vec<ProseAction> {
    let cleaned = clean(text);
    let mut actions: Vec<ProseAction> = Vec::new();

    for sentence in sentences(&cleaned) {
        if let Some(name) = heading(sentence) {
            actions.push(ProseAction {
                name,
                description: String::new(),
            });
            continue;
        }
        if let Some(current) = actions.last_mut() {
            if !current.description.is_empty() {
                current.description.push(' ');
            }
            current.description.push_str(sentence);
        }
    }

    actions
}

pub fn first_int(text: &str) -> Option<i64> {
    FIRST_INT
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

pub fn to_hit(text: &str) -> Option<i32> {
    TO_HIT
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Canonical dice notation: whitespace removed, e.g. `1d6 + 2` → `1d6+2`.
/// Returns `None` for anything that is not dice or a flat number.
pub fn canonical_dice(expr: &str) -> Option<String> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    if DICE.is_match(&compact) {
        Some(compact)
    } else {
        None
    }
}

/// Compose `damage_dice` and `damage_bonus` into one expression.
pub fn dice_with_bonus(dice: &str, bonus: i64) -> Option<String> {
    let dice = canonical_dice(dice)?;
    match bonus {
        0 => Some(dice),
        b if b > 0 => canonical_dice(&format!("{}+{}", dice, b)),
        b => canonical_dice(&format!("{}-{}", dice, b.unsigned_abs())),
    }
}

pub fn damage(text: &str) -> Option<String> {
    DICE_IN_PARENS
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| canonical_dice(m.as_str()))
}

pub fn damage_type(text: &str) -> Option<String> {
    DAMAGE_TYPE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

pub fn save_dc(text: &str) -> Option<(u32, Ability)> {
    let caps = SAVE_DC.captures(text)?;
    let dc = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let ability = Ability::parse(caps.get(2)?.as_str())?;
    Some((dc, ability))
}

/// First condition keyword mentioned, in `Condition::ALL` order.
pub fn condition(text: &str) -> Option<Condition> {
    let lower = text.to_ascii_lowercase();
    Condition::ALL
        .into_iter()
        .find(|c| lower.contains(c.tag()))
}

/// Reach takes precedence over a ranged-attack range.
pub fn range_feet(text: &str) -> Option<u32> {
    REACH
        .captures(text)
        .or_else(|| RANGE.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

pub fn mentions_spell(text: &str) -> bool {
    SPELL.is_match(text)
}

/// Parse `"Stealth +6, Perception +2"`. Entries without a signed bonus are
/// skipped.
pub fn skills(text: &str) -> Vec<(String, i32)> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let caps = SKILL_ENTRY.captures(part)?;
            let bonus = caps.get(2)?.as_str().parse::<i32>().ok()?;
            Some((caps.get(1)?.as_str().trim().to_string(), bonus))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOBLIN_ACTIONS: &str = "<p>Scimitar. Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage.</p> Shortbow. Ranged Weapon Attack: +4 to hit, range 80/320 ft., one target. Hit: 5 (1d6 + 2) piercing damage.";

    #[test]
    fn split_actions_finds_each_heading() {
        let actions = split_actions(GOBLIN_ACTIONS);
        let names: Vec<&str> = actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Scimitar", "Shortbow"]);
        assert!(actions[0].description.starts_with("Melee Weapon Attack"));
        assert!(actions[0].description.ends_with("slashing damage."));
    }

    #[test]
    fn long_capitalized_sentence_is_not_a_heading() {
        let text = "Bite. Melee Weapon Attack: +4 to hit. The target is knocked down hard now.";
        let actions = split_actions(text);
        assert_eq!(actions.len(), 1);
        assert!(actions[0].description.contains("knocked down"));
    }

    #[test]
    fn heading_with_recharge_parenthetical() {
        let text = "Fire Breath (Recharge 5-6). The dragon exhales fire. Each creature must make a DC 13 Dexterity saving throw.";
        let actions = split_actions(text);
        assert_eq!(actions[0].name, "Fire Breath (Recharge 5-6)");
        assert_eq!(save_dc(&actions[0].description), Some((13, Ability::Dexterity)));
    }

    #[test]
    fn text_before_first_heading_is_dropped() {
        let actions = split_actions("the creature makes two attacks: one with its bite");
        assert!(actions.is_empty());
    }

    #[test]
    fn extracts_mechanics_from_description() {
        let desc = "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 7 (2d4 + 2) piercing damage. If the target is a creature, it must succeed on a DC 11 Strength saving throw or be knocked prone.";
        assert_eq!(to_hit(desc), Some(4));
        assert_eq!(damage(desc), Some("2d4+2".to_string()));
        assert_eq!(damage_type(desc), Some("piercing".to_string()));
        assert_eq!(save_dc(desc), Some((11, Ability::Strength)));
        assert_eq!(condition(desc), Some(Condition::Prone));
        assert_eq!(range_feet(desc), Some(5));
    }

    #[test]
    fn ranged_attack_uses_range() {
        assert_eq!(range_feet("Ranged Weapon Attack: +4 to hit, range 80/320 ft."), Some(80));
    }

    #[test]
    fn dice_canonicalization() {
        assert_eq!(canonical_dice("1d6 + 2"), Some("1d6+2".to_string()));
        assert_eq!(canonical_dice("3"), Some("3".to_string()));
        assert_eq!(canonical_dice("a lot"), None);
        assert_eq!(dice_with_bonus("2d8", -1), Some("2d8-1".to_string()));
        assert_eq!(dice_with_bonus("2d8", 0), Some("2d8".to_string()));
    }

    #[test]
    fn skills_string_parses() {
        assert_eq!(
            skills("Stealth +6, Perception -1, Arcana"),
            vec![("Stealth".to_string(), 6), ("Perception".to_string(), -1)]
        );
    }

    #[test]
    fn first_int_handles_signs() {
        assert_eq!(first_int("AC -2 (cursed)"), Some(-2));
        assert_eq!(first_int("none"), None);
    }
}
