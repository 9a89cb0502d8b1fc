/// The corpus pipeline: Load → Normalize → Emit orchestration.
///
/// Runs as a strict linear sequence of stages. Per-record normalization
/// failures are absorbed and reported; source and write failures abort.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::config::{ConfigError, CorpusConfig};
use crate::core::emit::{CorpusEmitter, EmitError};
use crate::core::loader::{LoadError, SourceLoader};
use crate::core::normalize::{normalize_batch, SchemaViolation};
use crate::core::rules::{HouseRules, RulesError};
use crate::core::samples::generate_samples;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
    #[error("no records normalized out of {records} ({violations} violations)")]
    NothingNormalized { records: usize, violations: usize },
}

/// Pipeline lifecycle. `Failed` is terminal and reachable from `Loading`,
/// `Normalizing` (nothing survived) and `Emitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Loading,
    Normalizing,
    Emitting,
    Done,
    Failed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Normalizing => "normalizing",
            Self::Emitting => "emitting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// End-of-run report, including every skipped record.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub source: PathBuf,
    pub format: &'static str,
    pub raw_records: usize,
    pub monsters: usize,
    pub actions: usize,
    pub samples: usize,
    pub violations: Vec<SchemaViolation>,
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source:              {} ({})", self.source.display(), self.format)?;
        writeln!(f, "Monsters loaded:     {}", self.raw_records)?;
        writeln!(f, "Monsters normalized: {}", self.monsters)?;
        writeln!(f, "Actions extracted:   {}", self.actions)?;
        writeln!(f, "Training samples:    {}", self.samples)?;
        writeln!(f, "Output directory:    {}", self.out_dir.display())?;
        write!(f, "Schema violations:   {}", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

/// The top-level corpus pipeline. Built via `CorpusPipeline::builder()`.
pub struct CorpusPipeline {
    config: CorpusConfig,
    rules: HouseRules,
    loader: SourceLoader,
    stage: Stage,
}

/// Builder for constructing a `CorpusPipeline`.
pub struct CorpusPipelineBuilder {
    config: CorpusConfig,
    config_path: Option<PathBuf>,
    entity: Option<String>,
    data_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    rules_version: Option<String>,
    seed: Option<u64>,
    /// Directly provided loader (for custom format priority).
    loader: Option<SourceLoader>,
}

impl CorpusPipeline {
    pub fn builder() -> CorpusPipelineBuilder {
        CorpusPipelineBuilder {
            config: CorpusConfig::default(),
            config_path: None,
            entity: None,
            data_dir: None,
            out_dir: None,
            rules_version: None,
            seed: None,
            loader: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn rules(&self) -> &HouseRules {
        &self.rules
    }

    /// Run the full pipeline once. Safe to call again; each run overwrites
    /// the previous run's output.
    pub fn run(&mut self) -> Result<RunSummary, PipelineError> {
        self.stage = Stage::Idle;

        self.transition(Stage::Loading);
        let source = match self.loader.load(&self.config.entity, &self.config.data_dir) {
            Ok(source) => source,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.transition(Stage::Normalizing);
        let batch = normalize_batch(&source.records);
        if batch.monsters.is_empty() {
            return Err(self.fail(PipelineError::NothingNormalized {
                records: source.records.len(),
                violations: batch.violations.len(),
            }));
        }

        self.transition(Stage::Emitting);
        let samples = generate_samples(&batch.monsters, &self.rules, self.config.sample_seed);
        let emitter = CorpusEmitter::new(self.config.out_dir.clone());
        let report = match emitter.emit(&batch.monsters, &self.rules, &samples) {
            Ok(report) => report,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.transition(Stage::Done);
        if !batch.violations.is_empty() {
            tracing::warn!(
                count = batch.violations.len(),
                "some records were skipped; see summary"
            );
        }

        Ok(RunSummary {
            source: source.path,
            format: source.format,
            raw_records: source.records.len(),
            monsters: report.monsters,
            actions: report.actions,
            samples: report.samples,
            violations: batch.violations,
            out_dir: emitter.out_dir().to_path_buf(),
            files: report.files,
        })
    }

    fn transition(&mut self, next: Stage) {
        tracing::info!(from = self.stage.name(), to = next.name(), "stage");
        self.stage = next;
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        tracing::error!(stage = self.stage.name(), error = %err, "pipeline failed");
        self.stage = Stage::Failed;
        err
    }
}

impl CorpusPipelineBuilder {
    /// Start from an in-memory config.
    pub fn config(mut self, config: CorpusConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the base config from a RON file at build time.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn entity(mut self, entity: &str) -> Self {
        self.entity = Some(entity.to_string());
        self
    }

    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    pub fn rules_version(mut self, version: &str) -> Self {
        self.rules_version = Some(version.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provide a loader directly (for a custom format priority list).
    pub fn with_loader(mut self, loader: SourceLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Explicit setters override the config file, which overrides defaults.
    pub fn build(self) -> Result<CorpusPipeline, PipelineError> {
        let mut config = match self.config_path {
            Some(ref path) => CorpusConfig::load_from_ron(path)?,
            None => self.config,
        };

        if let Some(entity) = self.entity {
            config.entity = entity;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.out_dir {
            config.out_dir = dir;
        }
        if let Some(version) = self.rules_version {
            config.rules.version = Some(version);
        }
        if let Some(seed) = self.seed {
            config.sample_seed = seed;
        }

        let rules = config.rules.build()?;
        tracing::debug!(?config, "pipeline configured");

        Ok(CorpusPipeline {
            config,
            rules,
            loader: self.loader.unwrap_or_default(),
            stage: Stage::Idle,
        })
    }
}
