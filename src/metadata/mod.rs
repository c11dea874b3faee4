//! Metadata module - Per-item JSON records describing backed-up items.
//!
//! This module contains:
//! - The record format (`<name>.json` under each category directory)
//! - Pattern defaults used to seed a fresh record's `meta`
//! - The store that rotates old records into the archive before rewriting

pub mod pattern;
pub mod store;

pub use pattern::{load_meta_pattern, MetaPattern};
pub use store::MetadataStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Category of a backed-up item, also the directory name of its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Config,
    Themes,
    Icons,
    Fonts,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Themes,
        Category::Fonts,
        Category::Icons,
        Category::Config,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Config => "config",
            Category::Themes => "themes",
            Category::Icons => "icons",
            Category::Fonts => "fonts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Copied from the user's application config folder
    Local,
    /// Discovered in a theme/icon search path, recorded but not copied
    Manual,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Manual => "manual",
        }
    }
}

/// Error returned when an existing record cannot be used.
#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record is not a JSON object")]
    NotAnObject,
}

/// Metadata record as persisted on disk.
///
/// Unknown top-level keys of an existing record survive a rewrite through
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
    /// Free-form descriptive payload. Only carried forward or initialized.
    #[serde(default)]
    pub meta: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    /// Parse a record. Anything that is not a JSON object is rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordParseError> {
        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(RecordParseError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Whether `meta` needs to be seeded from a pattern.
    pub fn has_meta(&self) -> bool {
        is_truthy(&self.meta)
    }

    /// Overwrite the provenance fields, leaving `meta` and extras alone.
    pub fn set_provenance(&mut self, name: &str, source: SourceKind, path: &str) {
        self.name = Some(Value::String(name.to_string()));
        self.source = Some(Value::String(source.as_str().to_string()));
        self.path = Some(Value::String(path.to_string()));
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// An empty or null payload counts as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
