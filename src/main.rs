//! dotstyle CLI - Back up desktop style configuration per OS.
//!
//! Usage:
//!   dotstyle [backup]     - Copy config folders, record themes/icons
//!   dotstyle os-id        - Print the detected OS identity
//!   dotstyle init-config  - Write the default config file

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("dotstyle={}", log_level).parse()?),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        None => cli::commands::backup(config_path, None, false),
        Some(Commands::Backup { root, fonts }) => cli::commands::backup(config_path, root, fonts),
        Some(Commands::OsId) => cli::commands::os_id(config_path),
        Some(Commands::InitConfig { force }) => cli::commands::init_config(config_path, force),
    }
}
