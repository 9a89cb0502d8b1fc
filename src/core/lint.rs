//! Re-reads a written corpus directory and checks it against the
//! consistency contract.

use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::emit::{ACTIONS_FILE, MONSTERS_FILE, RULES_FILE, SAMPLES_FILE};
use super::rules::HouseRules;
use crate::schema::action::OwnedAction;
use crate::schema::contract::{check_monster, check_rules, ContractBreach};
use crate::schema::monster::Monster;

/// The corpus could not be read at all.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One problem found in an otherwise readable corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintFinding {
    #[error("{file}:{line}: {reason}")]
    BadLine {
        file: &'static str,
        line: usize,
        reason: String,
    },
    #[error("actions.normalized.jsonl:{line}: action '{action}' names unknown monster '{monster}'")]
    UnknownMonster {
        line: usize,
        action: String,
        monster: String,
    },
    #[error("monsters.normalized.json: {0}")]
    Monster(ContractBreach),
    #[error("rules.snapshot.json: {0}")]
    Rules(ContractBreach),
}

#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub monsters: usize,
    pub actions: usize,
    pub samples: usize,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn lint_corpus(out_dir: &Path) -> Result<LintReport, LintError> {
    let mut report = LintReport::default();

    let monsters: Vec<Monster> = read_json(&out_dir.join(MONSTERS_FILE))?;
    let rules: HouseRules = read_json(&out_dir.join(RULES_FILE))?;
    report.monsters = monsters.len();

    let names: FxHashSet<&str> = monsters.iter().map(|m| m.name.as_str()).collect();
    for monster in &monsters {
        report
            .findings
            .extend(check_monster(monster).into_iter().map(LintFinding::Monster));
    }
    report
        .findings
        .extend(check_rules(&rules).into_iter().map(LintFinding::Rules));

    let actions = read_to_string(&out_dir.join(ACTIONS_FILE))?;
    for (line, text) in numbered_lines(&actions) {
        report.actions += 1;
        match serde_json::from_str::<OwnedAction>(text) {
            Ok(owned) if !names.contains(owned.monster_name.as_str()) => {
                report.findings.push(LintFinding::UnknownMonster {
                    line,
                    action: owned.action.name,
                    monster: owned.monster_name,
                });
            }
            Ok(_) => {}
            Err(e) => report.findings.push(LintFinding::BadLine {
                file: ACTIONS_FILE,
                line,
                reason: e.to_string(),
            }),
        }
    }

    // Samples are heterogeneous; each line only has to be a JSON object
    // carrying the three sample keys.
    let samples = read_to_string(&out_dir.join(SAMPLES_FILE))?;
    for (line, text) in numbered_lines(&samples) {
        report.samples += 1;
        let reason = match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => ["instruction", "input", "output"]
                .into_iter()
                .find(|key| value.get(key).is_none())
                .map(|key| format!("sample is missing '{}'", key)),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = reason {
            report.findings.push(LintFinding::BadLine {
                file: SAMPLES_FILE,
                line,
                reason,
            });
        }
    }

    tracing::debug!(
        monsters = report.monsters,
        actions = report.actions,
        findings = report.findings.len(),
        "lint finished"
    );
    Ok(report)
}

/// Non-empty lines with their 1-based line numbers.
fn numbered_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
}

fn read_to_string(path: &Path) -> Result<String, LintError> {
    std::fs::read_to_string(path).map_err(|source| LintError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LintError> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| LintError::Json {
        path: path.to_path_buf(),
        source,
    })
}
