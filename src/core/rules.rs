//! Rules snapshot: the active hybrid house-rule configuration.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Version written when none is configured.
pub const PLACEHOLDER_VERSION: &str = "unversioned";

pub const DEFAULT_MODIFIER_RANGE: (i32, i32) = (-2, 2);

pub const DEFAULT_NOTES: &str =
    "Hybrid rules: use flat modifiers instead of advantage/disadvantage mechanics.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("flat modifier range [{0}, {1}] must satisfy min <= 0 <= max")]
    InvalidModifierRange(i32, i32),
}

/// Immutable once built. Each corpus run builds a fresh one and threads it
/// through the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRules {
    pub version: String,
    pub no_advantage_disadvantage: bool,
    /// Inclusive `[min, max]` range of permitted flat modifiers.
    pub flat_modifier_range: (i32, i32),
    pub notes: String,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            version: PLACEHOLDER_VERSION.to_string(),
            no_advantage_disadvantage: true,
            flat_modifier_range: DEFAULT_MODIFIER_RANGE,
            notes: DEFAULT_NOTES.to_string(),
        }
    }
}

impl HouseRules {
    pub fn new(
        version: Option<String>,
        flat_modifier_range: (i32, i32),
        notes: Option<String>,
    ) -> Result<Self, RulesError> {
        let (min, max) = flat_modifier_range;
        if min > 0 || max < 0 {
            return Err(RulesError::InvalidModifierRange(min, max));
        }

        let version = version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_VERSION.to_string());

        Ok(Self {
            version,
            no_advantage_disadvantage: true,
            flat_modifier_range,
            notes: notes.unwrap_or_else(|| DEFAULT_NOTES.to_string()),
        })
    }

    pub fn min_modifier(&self) -> i32 {
        self.flat_modifier_range.0
    }

    pub fn max_modifier(&self) -> i32 {
        self.flat_modifier_range.1
    }

    /// Permitted cover bonuses: the non-negative part of the range.
    pub fn cover_bonuses(&self) -> RangeInclusive<i32> {
        0..=self.max_modifier()
    }
}
