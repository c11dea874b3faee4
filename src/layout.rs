//! Destination layout for one backup run.
//!
//! Every path the run reads or writes is derived from three values fixed at
//! startup: the repository root, the OS identity and the home directory.
//!
//! ```text
//! <root>/configs/<os-id>/
//!   config/<name>.json          local items
//!   themes/<name>.json          manual items
//!   icons/<name>.json
//!   fonts/<name>.json
//!   <category>/_meta/*.json     pattern defaults
//!   backup_metadata/*.json      rotated records
//! <root>/dotfiles/config/<name>/  copied config trees
//! ```

use crate::metadata::Category;
use crate::os_release::OsIdentity;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding per-OS backups under the root
const CONFIGS_DIR: &str = "configs";

/// Archive directory for rotated metadata records
const ARCHIVE_DIR: &str = "backup_metadata";

/// Directory holding pattern defaults inside a category
pub const META_PATTERN_DIR: &str = "_meta";

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    os: OsIdentity,
    home: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, os: OsIdentity, home: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            os,
            home: home.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn os(&self) -> &OsIdentity {
        &self.os
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// `<root>/configs/<os-id>`
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(CONFIGS_DIR).join(self.os.as_dir_name())
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.target_dir().join(category.dir_name())
    }

    pub fn meta_pattern_dir(&self, category: Category) -> PathBuf {
        self.category_dir(category).join(META_PATTERN_DIR)
    }

    /// Path of the metadata record for `(category, name)`.
    pub fn record_path(&self, category: Category, name: &str) -> PathBuf {
        self.category_dir(category).join(format!("{}.json", name))
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.target_dir().join(ARCHIVE_DIR)
    }

    /// Where copied config folders land (`<root>/dotfiles/config`, shared
    /// across OS identities).
    pub fn dotfiles_config_dir(&self) -> PathBuf {
        self.root.join("dotfiles").join("config")
    }

    /// The user's application config root (`~/.config`).
    pub fn user_config_dir(&self) -> PathBuf {
        self.home.join(".config")
    }

    /// Expand a leading `~` against the home directory.
    pub fn expand_home(&self, raw: &str) -> PathBuf {
        if raw == "~" {
            self.home.clone()
        } else if let Some(rest) = raw.strip_prefix("~/") {
            self.home.join(rest)
        } else {
            PathBuf::from(raw)
        }
    }

    /// Home-relative display form (`~/...`) of a resolved path.
    ///
    /// Falls back to the resolved absolute path when it lies outside home,
    /// and to the path as given when it cannot be resolved.
    pub fn display_path(&self, path: &Path) -> String {
        let resolved = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        let home = self
            .home
            .canonicalize()
            .unwrap_or_else(|_| self.home.clone());

        match resolved.strip_prefix(&home) {
            Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => resolved.display().to_string(),
        }
    }

    /// Create the category, dotfiles and archive directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        let mut dirs: Vec<PathBuf> = Category::ALL
            .iter()
            .map(|c| self.category_dir(*c))
            .collect();
        dirs.push(self.dotfiles_config_dir());
        dirs.push(self.archive_dir());

        for dir in dirs {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Cannot create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
