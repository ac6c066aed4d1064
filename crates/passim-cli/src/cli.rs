//! Command-line argument definitions.

use clap::{Parser, Subcommand};

/// Passim: synchronized full-text search over a passage library
#[derive(Parser, Debug)]
#[command(name = "passim", version)]
#[command(about = "Passim library search administration tool", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PASSIM_CONFIG")]
    pub config: Option<String>,

    /// JSON dataset to load (overrides `data_path`)
    #[arg(short, long, global = true)]
    pub data: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the search index from the entity store
    Rebuild,

    /// Search the index and print the hits as JSON
    Search(SearchArgs),

    /// List raw passages as JSON
    Passages,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `passim search`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Web-search style query (put it after `--` when it starts with `-`)
    pub query: String,

    /// Analyzer language (defaults to `search.default_language`)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Entity kind to search (defaults to `search.default_kind`)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Maximum number of hits
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Do not attribute metadata hits to their passages
    #[arg(long)]
    pub no_expand: bool,
}

/// `passim config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key, e.g. `search.max_words`
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Target file (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for docker
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
