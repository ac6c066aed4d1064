//! Passim CLI
//!
//! Command-line interface for Passim library search administration.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use passim_cli::commands::{cmd_passages, cmd_rebuild, cmd_search, open_library};
use passim_cli::config_handlers::handle_config_command;
use passim_cli::{Cli, Command, PassimConfig};
use passim_core::ConfigManager;
use passim_storage::Library;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let output = match cli.command {
        // Config commands work on the file itself and must not require it to load.
        Command::Config { action } => {
            init_tracing(cli.verbose, "warn");
            handle_config_command(config_path, action)?;
            return Ok(());
        }
        Command::Rebuild => cmd_rebuild(&start(config_path, cli.data, cli.verbose)?)?,
        Command::Search(args) => {
            cmd_search(&start(config_path, cli.data, cli.verbose)?, args).await?
        }
        Command::Passages => cmd_passages(&start(config_path, cli.data, cli.verbose)?)?,
    };
    println!("{output}");
    Ok(())
}

/// Loads the configuration, starts logging and opens the library.
fn start(config_path: Option<&str>, data: Option<String>, verbose: bool) -> Result<Library> {
    let mut config = PassimConfig::load(config_path)?;
    if let Some(data) = data {
        config.data_path = Some(data);
    }
    init_tracing(verbose, &config.logging.level);
    tracing::debug!(data_path = ?config.data_path, "Configuration loaded");
    Ok(open_library(&config)?)
}

fn init_tracing(verbose: bool, level: &str) {
    let fallback = if verbose { "debug" } else { level };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}
