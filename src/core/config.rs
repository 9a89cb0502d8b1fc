//! Run configuration, loadable from a RON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::rules::{HouseRules, RulesError, DEFAULT_MODIFIER_RANGE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
}

/// House-rule settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub version: Option<String>,
    pub flat_modifier_range: (i32, i32),
    pub notes: Option<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            version: None,
            flat_modifier_range: DEFAULT_MODIFIER_RANGE,
            notes: None,
        }
    }
}

impl RulesConfig {
    pub fn build(&self) -> Result<HouseRules, RulesError> {
        HouseRules::new(
            self.version.clone(),
            self.flat_modifier_range,
            self.notes.clone(),
        )
    }
}

/// Everything one corpus run needs. Every field has a default, so an empty
/// config file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Logical entity class; selects `SRD_<Entity>.json|txt`.
    pub entity: String,
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Seed for picking the monsters in the attack-resolution sample.
    pub sample_seed: u64,
    pub rules: RulesConfig,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            entity: "monsters".to_string(),
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("training/out"),
            sample_seed: 42,
            rules: RulesConfig::default(),
        }
    }
}

impl CorpusConfig {
    /// Load a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<CorpusConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a config from a RON string.
    pub fn parse_ron(input: &str) -> Result<CorpusConfig, ConfigError> {
        let config: CorpusConfig = ron::from_str(input)?;
        config.rules.build()?;
        Ok(config)
    }
}
