//! Backup module - Walk configured sources and record each item.
//!
//! Config folders are copied into the dotfiles tree and recorded as `local`.
//! Theme, icon and font folders are only discovered and recorded as `manual`;
//! their files stay where they are.

pub mod copy;

use crate::layout::Layout;
use crate::metadata::{Category, MetadataStore, SourceKind};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Resolved source locations for one run.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// Folder names under `~/.config`
    pub config_items: Vec<String>,
    pub theme_dirs: Vec<PathBuf>,
    pub icon_dirs: Vec<PathBuf>,
    pub font_dirs: Vec<PathBuf>,
    /// Fonts are skipped unless enabled
    pub include_fonts: bool,
}

/// One item processed during a run.
#[derive(Debug, Clone)]
pub struct BackupItem {
    pub name: String,
    pub category: Category,
    pub source_kind: SourceKind,
    pub source_path: PathBuf,
    /// Copied tree for local items; `None` for record-only items
    pub destination_path: Option<PathBuf>,
    /// Where the metadata record was written
    pub record_path: PathBuf,
}

/// Summary of a run.
#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    pub items: Vec<BackupItem>,
    /// Records rotated into the archive during the run
    pub archived: Vec<PathBuf>,
}

impl BackupReport {
    pub fn extend(&mut self, other: BackupReport) {
        self.items.extend(other.items);
        self.archived.extend(other.archived);
    }

    pub fn count(&self, category: Category) -> usize {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .count()
    }
}

/// Whether a child of a search directory is eligible for `category`.
///
/// Fonts may be single files; everything else must be a directory.
pub fn qualifies(category: Category, is_dir: bool) -> bool {
    is_dir || category == Category::Fonts
}

pub struct StyleBackup {
    store: MetadataStore,
    sources: Sources,
}

impl StyleBackup {
    pub fn new(layout: Layout, sources: Sources) -> Self {
        Self {
            store: MetadataStore::new(layout),
            sources,
        }
    }

    pub fn layout(&self) -> &Layout {
        self.store.layout()
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Run the whole backup: prepare directories, then config items,
    /// themes, icons and (if enabled) fonts, in that order.
    pub fn run(&self) -> Result<BackupReport> {
        info!("[Backup] Target: {:?}", self.layout().target_dir());
        self.layout().ensure_dirs()?;

        let mut report = self.backup_config_items()?;
        report.extend(self.backup_dir_items(&self.sources.theme_dirs, Category::Themes)?);
        report.extend(self.backup_dir_items(&self.sources.icon_dirs, Category::Icons)?);
        if self.sources.include_fonts {
            report.extend(self.backup_dir_items(&self.sources.font_dirs, Category::Fonts)?);
        }

        Ok(report)
    }

    /// Copy each configured `~/.config/<item>` over its dotfiles copy and
    /// refresh its record. Missing items are skipped.
    pub fn backup_config_items(&self) -> Result<BackupReport> {
        let layout = self.layout();
        let config_root = layout.user_config_dir();
        let dotfiles_root = layout.dotfiles_config_dir();
        let mut report = BackupReport::default();

        for item in &self.sources.config_items {
            let src = config_root.join(item);
            if !src.exists() {
                debug!("[Backup] Config not found, skipping: {:?}", src);
                continue;
            }

            info!("[Backup] Config: {}", item);
            let dst = dotfiles_root.join(item);
            let files = copy::replace_with_copy(&src, &dst)
                .with_context(|| format!("Failed to back up config '{}'", item))?;
            debug!("[Backup] Copied {} files for {}", files, item);

            let record_path = layout.record_path(Category::Config, item);
            let update = self.store.refresh(
                &record_path,
                item,
                SourceKind::Local,
                &layout.display_path(&src),
                Category::Config,
            )?;

            report.archived.extend(update.archived);
            report.items.push(BackupItem {
                name: item.clone(),
                category: Category::Config,
                source_kind: SourceKind::Local,
                source_path: src,
                destination_path: Some(dst),
                record_path,
            });
        }

        Ok(report)
    }

    /// Record every qualifying child of each existing search directory.
    ///
    /// Same-named items in later directories overwrite earlier records
    /// (each overwrite is rotated first).
    pub fn backup_dir_items(&self, search_dirs: &[PathBuf], category: Category) -> Result<BackupReport> {
        let layout = self.layout();
        let mut report = BackupReport::default();

        for dir in search_dirs {
            if !dir.is_dir() {
                debug!("[Backup] Search dir not found, skipping: {:?}", dir);
                continue;
            }

            let mut children = Vec::new();
            for entry in fs::read_dir(dir).with_context(|| format!("Cannot read {}", dir.display()))? {
                children.push(entry?.path());
            }
            children.sort();

            for child in children {
                if !qualifies(category, child.is_dir()) {
                    continue;
                }
                let Some(name) = child.file_name().map(|n| n.to_string_lossy().to_string()) else {
                    continue;
                };

                info!("[Backup] {}: {} (from {:?})", category, name, dir);
                let record_path = layout.record_path(category, &name);
                let update = self.store.refresh(
                    &record_path,
                    &name,
                    SourceKind::Manual,
                    &layout.display_path(&child),
                    category,
                )?;

                report.archived.extend(update.archived);
                report.items.push(BackupItem {
                    name,
                    category,
                    source_kind: SourceKind::Manual,
                    source_path: child,
                    destination_path: None,
                    record_path,
                });
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os_release::OsIdentity;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        home: PathBuf,
        layout: Layout,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        fs::create_dir_all(&home).unwrap();
        let os = OsIdentity::parse("ID=arch\nVERSION_ID=rolling\n");
        let layout = Layout::new(temp.path().join("repo"), os, &home);
        Fixture {
            _temp: temp,
            home,
            layout,
        }
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_qualifies() {
        assert!(qualifies(Category::Themes, true));
        assert!(!qualifies(Category::Themes, false));
        assert!(!qualifies(Category::Icons, false));
        assert!(!qualifies(Category::Config, false));
        assert!(qualifies(Category::Fonts, false));
        assert!(qualifies(Category::Fonts, true));
    }

    #[test]
    fn test_missing_config_item_skipped() {
        let fx = fixture();
        let sources = Sources {
            config_items: vec!["menus".to_string()],
            ..Default::default()
        };
        let backup = StyleBackup::new(fx.layout.clone(), sources);
        let report = backup.run().unwrap();

        assert!(report.items.is_empty());
        assert!(!fx.layout.record_path(Category::Config, "menus").exists());
    }

    #[test]
    fn test_dir_items_skip_plain_files() {
        let fx = fixture();
        let themes = fx.home.join(".themes");
        fs::create_dir_all(themes.join("Nordic")).unwrap();
        fs::write(themes.join("README"), "not a theme").unwrap();

        let backup = StyleBackup::new(fx.layout.clone(), Sources::default());
        let report = backup
            .backup_dir_items(&[themes.clone()], Category::Themes)
            .unwrap();

        assert_eq!(report.count(Category::Themes), 1);
        assert!(report.items[0].destination_path.is_none());
        assert!(!fx.layout.record_path(Category::Themes, "README").exists());
        assert_eq!(
            read_json(&fx.layout.record_path(Category::Themes, "Nordic")),
            json!({"name": "Nordic", "source": "manual", "path": "~/.themes/Nordic", "meta": {}})
        );
    }

    #[test]
    fn test_name_collision_last_write_wins() {
        let fx = fixture();
        let first = fx.home.join(".icons");
        let second = fx.home.join(".local/share/icons");
        fs::create_dir_all(first.join("Papirus")).unwrap();
        fs::create_dir_all(second.join("Papirus")).unwrap();

        let backup = StyleBackup::new(fx.layout.clone(), Sources::default());
        let report = backup
            .backup_dir_items(&[first, second], Category::Icons)
            .unwrap();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.archived.len(), 1);
        assert_eq!(
            read_json(&fx.layout.record_path(Category::Icons, "Papirus"))["path"],
            json!("~/.local/share/icons/Papirus")
        );
    }

    #[test]
    fn test_fonts_only_when_enabled() {
        let fx = fixture();
        let fonts = fx.home.join(".fonts");
        fs::create_dir_all(&fonts).unwrap();
        fs::write(fonts.join("Inter.ttf"), "font").unwrap();

        let mut sources = Sources {
            font_dirs: vec![fonts],
            ..Default::default()
        };
        let report = StyleBackup::new(fx.layout.clone(), sources.clone())
            .run()
            .unwrap();
        assert_eq!(report.count(Category::Fonts), 0);

        sources.include_fonts = true;
        let report = StyleBackup::new(fx.layout.clone(), sources).run().unwrap();
        assert_eq!(report.count(Category::Fonts), 1);
        assert!(fx.layout.record_path(Category::Fonts, "Inter.ttf").exists());
    }
}
