use serde::{Deserialize, Serialize};

/// The six ability codes used for scores and saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    /// Three-letter code, e.g. "DEX".
    pub fn code(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }

    /// Lowercase full name, e.g. "dexterity".
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    /// Parse a code or full name, case-insensitively.
    pub fn parse(input: &str) -> Option<Ability> {
        let lower = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| lower == a.full_name() || lower == a.code().to_ascii_lowercase())
    }
}

/// What an action does mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Attack,
    Save,
    Utility,
    Spell,
}

/// How much of a turn an action consumes under the hybrid action economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionSpeed {
    Move,
    #[default]
    Standard,
    Quick,
    Immediate,
}

impl ActionSpeed {
    pub fn parse(input: &str) -> Option<ActionSpeed> {
        match input.trim().to_ascii_lowercase().as_str() {
            "move" => Some(Self::Move),
            "standard" => Some(Self::Standard),
            "quick" => Some(Self::Quick),
            "immediate" => Some(Self::Immediate),
            _ => None,
        }
    }
}

/// Conditions an action can apply to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Prone,
    Stunned,
    Frightened,
    Charmed,
    Paralyzed,
    Poisoned,
    Restrained,
    Blinded,
    Deafened,
    Grappled,
}

impl Condition {
    /// Detection order when scanning free text.
    pub const ALL: [Condition; 10] = [
        Self::Prone,
        Self::Stunned,
        Self::Frightened,
        Self::Charmed,
        Self::Paralyzed,
        Self::Poisoned,
        Self::Restrained,
        Self::Blinded,
        Self::Deafened,
        Self::Grappled,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Prone => "prone",
            Self::Stunned => "stunned",
            Self::Frightened => "frightened",
            Self::Charmed => "charmed",
            Self::Paralyzed => "paralyzed",
            Self::Poisoned => "poisoned",
            Self::Restrained => "restrained",
            Self::Blinded => "blinded",
            Self::Deafened => "deafened",
            Self::Grappled => "grappled",
        }
    }

    pub fn parse(input: &str) -> Option<Condition> {
        let lower = input.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.tag() == lower)
    }
}

/// A normalized action. Fields that do not apply to the action's category
/// serialize as `null`, never as a zero or empty-string sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(rename = "type")]
    pub category: ActionCategory,
    pub action_type: ActionSpeed,
    pub to_hit: Option<i32>,
    pub dc: Option<u32>,
    pub save: Option<Ability>,
    pub damage: Option<String>,
    pub damage_type: Option<String>,
    pub condition: Option<Condition>,
    /// Reach or range in feet.
    pub range: Option<u32>,
    pub description: String,
}

impl Action {
    pub fn is_attack(&self) -> bool {
        self.category == ActionCategory::Attack
    }
}

/// An action annotated with the monster it belongs to. This is the shape of
/// one line in the per-action corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedAction {
    pub monster_name: String,
    #[serde(flatten)]
    pub action: Action,
}
