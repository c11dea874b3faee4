//! Command implementations for the dotstyle CLI.
//!
//! Main commands:
//! - backup: copy config folders, record themes/icons, rotate old records
//! - os-id: print the OS identity the backup would be filed under
//! - init-config: write the default dotstyle.toml

use anyhow::{bail, Context, Result};
use colored::Colorize;
use dotstyle::config::default_config_path;
use dotstyle::{BackupReport, Category, Config, Layout, OsIdentity, SourceKind, StyleBackup};
use std::path::{Path, PathBuf};

fn load_config(config_path: Option<&Path>) -> Result<(Config, PathBuf)> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&path)?;
    Ok((config, path))
}

/// Run a full backup
pub fn backup(config_path: Option<&Path>, root: Option<PathBuf>, fonts: bool) -> Result<()> {
    let (mut config, _) = load_config(config_path)?;
    if root.is_some() {
        config.root_dir = root;
    }
    config.include_fonts |= fonts;

    let home = dirs::home_dir().context("Cannot determine home directory")?;
    let os = OsIdentity::detect_from(&config.os_release_paths);
    let layout = Layout::new(config.resolve_root()?, os, home);

    println!("{}", "📦 Starting backup for style configuration".cyan().bold());
    println!("🖥️  Detected OS: {}", layout.os().to_string().white().bold());

    let sources = config.sources(&layout);
    let backup = StyleBackup::new(layout, sources);
    let report = backup.run()?;

    print_report(&report);

    println!(
        "\n{} {}",
        "✅ Backup complete:".green().bold(),
        backup.layout().target_dir().display()
    );
    Ok(())
}

fn print_report(report: &BackupReport) {
    if report.items.is_empty() {
        println!("{}", "No items found to back up.".yellow());
        return;
    }

    for item in &report.items {
        match item.source_kind {
            SourceKind::Local => {
                println!("  📁 Backing up config: {}", item.name.white().bold());
            }
            SourceKind::Manual => {
                let from = item
                    .source_path
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!(
                    "  📦 Backing up {}: {} {}",
                    item.category,
                    item.name.white().bold(),
                    format!("(from {})", from).dimmed()
                );
            }
        }
    }

    println!();
    for category in [
        Category::Config,
        Category::Themes,
        Category::Icons,
        Category::Fonts,
    ] {
        let count = report.count(category);
        if count > 0 {
            println!(
                "  {} {} {}",
                "✓".green(),
                count.to_string().cyan(),
                category
            );
        }
    }
    if !report.archived.is_empty() {
        println!(
            "  {} {} previous records archived",
            "↻".cyan(),
            report.archived.len().to_string().cyan()
        );
    }
}

/// Print the detected OS identity
pub fn os_id(config_path: Option<&Path>) -> Result<()> {
    let (config, _) = load_config(config_path)?;
    let os = OsIdentity::detect_from(&config.os_release_paths);
    println!("{}", os);
    Ok(())
}

/// Write the default config file
pub fn init_config(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(&path)?;
    println!("  {} Wrote {}", "✓".green(), path.display());
    Ok(())
}
