//! Pattern defaults - seed `meta` for fresh records by name prefix.
//!
//! Pattern files live in `<category>/_meta/*.json`:
//!
//! ```json
//! { "name_pattern": "Nordic*", "meta": { "author": "EliverLara" } }
//! ```
//!
//! Without `name_pattern` the file stem itself is the prefix.

use super::RecordParseError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trailing wildcard marker stripped from `name_pattern`
const WILDCARD: char = '*';

#[derive(Debug, Clone, Deserialize)]
pub struct MetaPattern {
    #[serde(default)]
    pub name_pattern: Option<String>,
    /// camelCase spelling; `name_pattern` wins when a file has both
    #[serde(default, rename = "namePattern")]
    pub name_pattern_camel: Option<String>,
    #[serde(default = "empty_meta")]
    pub meta: Value,
}

fn empty_meta() -> Value {
    Value::Object(Map::new())
}

impl MetaPattern {
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordParseError> {
        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(RecordParseError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.name_pattern
            .as_deref()
            .or(self.name_pattern_camel.as_deref())
    }

    /// Prefix this pattern matches, given the stem of the file it came from.
    pub fn prefix<'a>(&'a self, file_stem: &'a str) -> Option<&'a str> {
        match self.pattern() {
            Some(pattern) => Some(pattern.trim_end_matches(WILDCARD)),
            None if !file_stem.is_empty() => Some(file_stem),
            None => None,
        }
    }

    pub fn matches(&self, file_stem: &str, name: &str) -> bool {
        self.prefix(file_stem)
            .is_some_and(|prefix| name.starts_with(prefix))
    }
}

/// `*.json` files directly under `dir`, sorted by file name.
fn pattern_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "json"))
        .collect();
    files.sort();
    files
}

/// Return the `meta` of the first pattern in `dir` matching `name`.
///
/// Unreadable or malformed pattern files are skipped. Returns an empty
/// object when nothing matches or the directory does not exist.
pub fn load_meta_pattern(dir: &Path, name: &str) -> Value {
    for path in pattern_files(dir) {
        let pattern = match fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| MetaPattern::parse(&bytes).map_err(|e| e.to_string()))
        {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!("[Pattern] Skipping {:?}: {}", path, e);
                continue;
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if pattern.matches(&stem, name) {
            debug!("[Pattern] {} matched {:?}", name, path);
            return pattern.meta;
        }
    }

    empty_meta()
}
