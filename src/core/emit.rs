//! Corpus emitter: writes the four output artifacts.
//!
//! Output is byte-for-byte reproducible for unchanged input. Field order
//! comes from struct declaration order, maps are ordered, and traversal
//! follows source order.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::rules::HouseRules;
use super::samples::owned_actions;
use crate::schema::monster::Monster;
use crate::schema::sample::TrainingSample;

pub const MONSTERS_FILE: &str = "monsters.normalized.json";
pub const ACTIONS_FILE: &str = "actions.normalized.jsonl";
pub const RULES_FILE: &str = "rules.snapshot.json";
pub const SAMPLES_FILE: &str = "prompts_samples.jsonl";

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON serialization error for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// What one emit pass wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub files: Vec<PathBuf>,
    pub monsters: usize,
    pub actions: usize,
    pub samples: usize,
}

/// Writes corpus artifacts into one output directory, overwriting any
/// previous run's files.
#[derive(Debug, Clone)]
pub struct CorpusEmitter {
    out_dir: PathBuf,
}

impl CorpusEmitter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn emit(
        &self,
        monsters: &[Monster],
        rules: &HouseRules,
        samples: &[TrainingSample],
    ) -> Result<EmitReport, EmitError> {
        std::fs::create_dir_all(&self.out_dir).map_err(|source| EmitError::CreateDir {
            path: self.out_dir.clone(),
            source,
        })?;

        let actions = owned_actions(monsters);
        let mut report = EmitReport {
            monsters: monsters.len(),
            actions: actions.len(),
            samples: samples.len(),
            ..EmitReport::default()
        };

        report.files.push(self.write_json(MONSTERS_FILE, monsters)?);
        report.files.push(self.write_jsonl(ACTIONS_FILE, &actions)?);
        report.files.push(self.write_json(RULES_FILE, rules)?);
        report.files.push(self.write_jsonl(SAMPLES_FILE, samples)?);

        Ok(report)
    }

    /// One pretty-printed JSON document with a trailing newline.
    fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<PathBuf, EmitError> {
        let path = self.out_dir.join(file);
        let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| EmitError::Serialize {
            path: path.clone(),
            source,
        })?;
        bytes.push(b'\n');
        self.write_bytes(path, &bytes)
    }

    /// One compact JSON object per line.
    fn write_jsonl<T: Serialize>(&self, file: &str, items: &[T]) -> Result<PathBuf, EmitError> {
        let path = self.out_dir.join(file);
        let mut bytes = Vec::new();
        for item in items {
            serde_json::to_writer(&mut bytes, item).map_err(|source| EmitError::Serialize {
                path: path.clone(),
                source,
            })?;
            bytes.push(b'\n');
        }
        self.write_bytes(path, &bytes)
    }

    fn write_bytes(&self, path: PathBuf, bytes: &[u8]) -> Result<PathBuf, EmitError> {
        std::fs::write(&path, bytes).map_err(|source| EmitError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "written");
        Ok(path)
    }
}
