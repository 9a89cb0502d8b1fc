//! Source loading: locate raw SRD files and parse them into raw records.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A raw, format-specific record. Transient: discarded after normalization.
pub type RawRecord = Value;

/// Keys under which wrapped JSON documents keep their record array.
const WRAPPER_KEYS: &[&str] = &["monsters", "data", "results"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no source data for '{entity}' in {}; tried: {}", .dir.display(), display_paths(.tried))]
    DataNotFound {
        entity: String,
        dir: PathBuf,
        tried: Vec<PathBuf>,
    },
    #[error("parse error in {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl LoadError {
    fn parse(path: &Path, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// One accepted on-disk source format.
pub trait SourceFormat {
    /// Short label used in logs.
    fn name(&self) -> &'static str;
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;
    /// Parse file contents into raw records.
    fn parse(&self, path: &Path, contents: &str) -> Result<Vec<RawRecord>, LoadError>;
}

/// Structured JSON: an array of objects, or an object wrapping one.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSource;

impl SourceFormat for JsonSource {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn parse(&self, path: &Path, contents: &str) -> Result<Vec<RawRecord>, LoadError> {
        let value: Value = serde_json::from_str(strip_bom(contents))
            .map_err(|e| LoadError::parse(path, format!("malformed JSON: {}", e)))?;
        unwrap_records(path, value)
    }
}

/// Loose text stat blocks. Blocks are separated by blank lines; each
/// non-indented line is `Key: value` and indented lines continue the value
/// of the previous key. Content that looks like JSON is parsed as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSource;

impl SourceFormat for TextSource {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn parse(&self, path: &Path, contents: &str) -> Result<Vec<RawRecord>, LoadError> {
        let contents = strip_bom(contents);
        let trimmed = contents.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            return JsonSource.parse(path, contents);
        }

        let mut records = Vec::new();
        let mut block = Map::new();
        let mut current_key: Option<String> = None;

        for (idx, line) in contents.lines().enumerate() {
            let line_no = idx + 1;

            if line.trim().is_empty() {
                if !block.is_empty() {
                    records.push(Value::Object(std::mem::take(&mut block)));
                }
                current_key = None;
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                let key = current_key.as_ref().ok_or_else(|| {
                    LoadError::parse(
                        path,
                        format!("line {}: continuation line with no preceding key", line_no),
                    )
                })?;
                if let Some(Value::String(existing)) = block.get_mut(key) {
                    if !existing.is_empty() {
                        existing.push(' ');
                    }
                    existing.push_str(line.trim());
                }
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| {
                LoadError::parse(
                    path,
                    format!("line {}: expected 'Key: value', found '{}'", line_no, line.trim()),
                )
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(LoadError::parse(path, format!("line {}: empty key", line_no)));
            }
            if block.contains_key(key) {
                tracing::warn!(
                    path = %path.display(),
                    line = line_no,
                    key,
                    "duplicate key in stat block; keeping the later value"
                );
            }
            block.insert(key.to_string(), Value::String(value.trim().to_string()));
            current_key = Some(key.to_string());
        }

        if !block.is_empty() {
            records.push(Value::Object(block));
        }

        Ok(records)
    }
}

fn strip_bom(contents: &str) -> &str {
    contents.strip_prefix('\u{feff}').unwrap_or(contents)
}

/// Accept a bare array, or an object that wraps the array under a known key.
/// Any other object is read as the sequence of its values.
fn unwrap_records(path: &Path, value: Value) -> Result<Vec<RawRecord>, LoadError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            // Only take a wrapper key out once it is known to hold the
            // array; removal must not disturb the order of the other values.
            for key in WRAPPER_KEYS {
                if matches!(map.get(*key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return Ok(items);
                    }
                }
            }
            Ok(map.into_iter().map(|(_, v)| v).collect())
        }
        other => Err(LoadError::parse(
            path,
            format!("expected an array of records, found {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The records read from one source file.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub format: &'static str,
    pub records: Vec<RawRecord>,
}

/// Probes formats in priority order and parses the first file found.
pub struct SourceLoader {
    formats: Vec<Box<dyn SourceFormat>>,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self {
            formats: vec![Box::new(JsonSource), Box::new(TextSource)],
        }
    }
}

impl SourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loader with a custom format priority list.
    pub fn with_formats(formats: Vec<Box<dyn SourceFormat>>) -> Self {
        Self { formats }
    }

    /// Candidate paths for an entity class, in priority order.
    /// `monsters` maps to `SRD_Monsters.json`, then `SRD_Monsters.txt`.
    pub fn candidates(&self, entity: &str, data_dir: &Path) -> Vec<PathBuf> {
        let stem = source_stem(entity);
        self.formats
            .iter()
            .map(|f| data_dir.join(format!("{}.{}", stem, f.extension())))
            .collect()
    }

    pub fn load(&self, entity: &str, data_dir: &Path) -> Result<LoadedSource, LoadError> {
        let candidates = self.candidates(entity, data_dir);

        for (format, path) in self.formats.iter().zip(&candidates) {
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "source candidate not present");
                continue;
            }

            let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let contents = String::from_utf8(bytes)
                .map_err(|e| LoadError::parse(path, format!("invalid UTF-8: {}", e)))?;
            let records = format.parse(path, &contents)?;
            tracing::info!(
                path = %path.display(),
                format = format.name(),
                records = records.len(),
                "loaded source"
            );
            return Ok(LoadedSource {
                path: path.clone(),
                format: format.name(),
                records,
            });
        }

        Err(LoadError::DataNotFound {
            entity: entity.to_string(),
            dir: data_dir.to_path_buf(),
            tried: candidates,
        })
    }
}

/// `monsters` → `SRD_Monsters`.
fn source_stem(entity: &str) -> String {
    let mut chars = entity.trim().chars();
    match chars.next() {
        Some(first) => format!("SRD_{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "SRD_".to_string(),
    }
}
