//! OS identity detection from os-release style files.
//!
//! The identity (`<ID>-<VERSION_ID>`) namespaces every backup, so it is
//! resolved once per run and then passed around as a plain value.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Value used for any key that is missing.
pub const UNKNOWN: &str = "unknown";

/// Standard os-release locations, in lookup order.
pub fn default_os_release_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/etc/os-release"),
        PathBuf::from("/usr/lib/os-release"),
    ]
}

/// Distro identity parsed from os-release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsIdentity {
    /// `ID` key (e.g. "arch", "ubuntu")
    pub id: String,
    /// `VERSION_ID` key (e.g. "rolling", "24.04")
    pub version_id: String,
}

impl OsIdentity {
    /// Identity used when no os-release file can be read.
    pub fn unknown() -> Self {
        Self {
            id: UNKNOWN.to_string(),
            version_id: UNKNOWN.to_string(),
        }
    }

    /// Parse the content of an os-release file.
    pub fn parse(content: &str) -> Self {
        let values = parse_key_values(content);
        let get = |key: &str| {
            values
                .get(key)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Self {
            id: get("ID"),
            version_id: get("VERSION_ID"),
        }
    }

    /// Read the first existing file among `paths`.
    pub fn detect_from(paths: &[PathBuf]) -> Self {
        for path in paths {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    debug!("[OsRelease] Using {:?}", path);
                    return Self::parse(&content);
                }
                Err(e) => debug!("[OsRelease] Cannot read {:?}: {}", path, e),
            }
        }
        Self::unknown()
    }

    /// Read a single file, falling back to unknown if absent.
    pub fn from_file(path: &Path) -> Self {
        Self::detect_from(&[path.to_path_buf()])
    }

    /// Directory-name form used for the backup root, `<id>-<version_id>`.
    pub fn as_dir_name(&self) -> String {
        format!("{}-{}", self.id, self.version_id)
    }
}

impl fmt::Display for OsIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.version_id)
    }
}

fn parse_key_values(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim_matches(|c: char| c == '"' || c == '\'');
            (key.to_string(), value.to_string())
        })
        .collect()
}
