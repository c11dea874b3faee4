//! Config module - dotstyle settings (dotstyle.toml).
//!
//! The config file holds:
//! - The repository root that receives backups
//! - Which config folders to copy and where to look for themes/icons/fonts
//! - Where to read the OS identity from

use crate::backup::Sources;
use crate::layout::Layout;
use crate::os_release::default_os_release_paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main dotstyle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repository root; the current directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,

    /// Folder names under ~/.config that get copied
    #[serde(default = "default_config_items")]
    pub config_items: Vec<String>,

    /// GTK theme search directories (`~/` is expanded)
    #[serde(default = "default_theme_dirs")]
    pub theme_dirs: Vec<String>,

    /// Icon theme search directories
    #[serde(default = "default_icon_dirs")]
    pub icon_dirs: Vec<String>,

    /// Font search directories
    #[serde(default = "default_font_dirs")]
    pub font_dirs: Vec<String>,

    /// Record fonts too (off by default)
    #[serde(default)]
    pub include_fonts: bool,

    /// os-release files tried in order
    #[serde(default = "default_os_release_paths")]
    pub os_release_paths: Vec<PathBuf>,
}

fn default_config_items() -> Vec<String> {
    ["fastfetch", "menus", "gtk-3.0", "gtk-4.0", "JetBrains"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_theme_dirs() -> Vec<String> {
    vec!["~/.themes".to_string(), "~/.local/share/themes".to_string()]
}

fn default_icon_dirs() -> Vec<String> {
    vec!["~/.icons".to_string(), "~/.local/share/icons".to_string()]
}

fn default_font_dirs() -> Vec<String> {
    vec!["~/.local/share/fonts".to_string(), "~/.fonts".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: None,
            config_items: default_config_items(),
            theme_dirs: default_theme_dirs(),
            icon_dirs: default_icon_dirs(),
            font_dirs: default_font_dirs(),
            include_fonts: false,
            os_release_paths: default_os_release_paths(),
        }
    }
}

/// Default config directory (~/.config/dotstyle/)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("dotstyle"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default config file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("dotstyle.toml")
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Cannot serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Cannot write config file: {}", path.display()))?;

        Ok(())
    }

    /// Repository root, falling back to the current directory
    pub fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root_dir {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("Cannot determine current directory"),
        }
    }

    /// Source locations with `~/` expanded against the layout's home
    pub fn sources(&self, layout: &Layout) -> Sources {
        let expand = |dirs: &[String]| -> Vec<PathBuf> {
            dirs.iter().map(|d| layout.expand_home(d)).collect()
        };

        Sources {
            config_items: self.config_items.clone(),
            theme_dirs: expand(&self.theme_dirs),
            icon_dirs: expand(&self.icon_dirs),
            font_dirs: expand(&self.font_dirs),
            include_fonts: self.include_fonts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os_release::OsIdentity;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.config_items.len(), 5);
        assert!(config.config_items.contains(&"gtk-4.0".to_string()));
        assert!(!config.include_fonts);
        assert!(config.root_dir.is_none());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested/dotstyle.toml");

        let mut config = Config::default();
        config.root_dir = Some(PathBuf::from("/home/user/dotfiles"));
        config.include_fonts = true;
        config.save(&config_path)?;

        let loaded = Config::load(&config_path)?;
        assert_eq!(loaded.root_dir, Some(PathBuf::from("/home/user/dotfiles")));
        assert!(loaded.include_fonts);
        assert_eq!(loaded.theme_dirs, config.theme_dirs);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("dotstyle.toml");
        std::fs::write(&config_path, "config_items = [\"kitty\"]\n")?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.config_items, vec!["kitty".to_string()]);
        assert_eq!(config.icon_dirs, default_icon_dirs());
        assert_eq!(config.os_release_paths, default_os_release_paths());

        Ok(())
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dotstyle.toml");
        std::fs::write(&config_path, "config_items = 3").unwrap();
        assert!(Config::load_or_default(&config_path).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp_dir.path().join("none.toml")).unwrap();
        assert_eq!(config.config_items, default_config_items());
    }

    #[test]
    fn test_sources_expand_home() {
        let layout = Layout::new("/repo", OsIdentity::unknown(), "/home/user");
        let sources = Config::default().sources(&layout);
        assert_eq!(
            sources.theme_dirs,
            vec![
                PathBuf::from("/home/user/.themes"),
                PathBuf::from("/home/user/.local/share/themes")
            ]
        );
        assert_eq!(sources.font_dirs[1], PathBuf::from("/home/user/.fonts"));
    }
}
