//! CLI definitions and command implementations for dotstyle.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dotstyle - Back up desktop style configuration per OS
#[derive(Parser)]
#[command(name = "dotstyle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/dotstyle/dotstyle.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Back up config folders and record themes/icons (default)
    Backup {
        /// Repository root receiving the backup (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Also record fonts
        #[arg(long)]
        fonts: bool,
    },

    /// Print the detected OS identity
    OsId,

    /// Write a config file with the default settings
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
