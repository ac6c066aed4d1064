//! Passim application configuration.
//!
//! ```toml
//! data_path = "/var/lib/passim/library.json"
//!
//! [search]
//! default_language = "english"
//! default_kind = "passage"
//! max_words = 35
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Environment overrides use the names `config export` prints:
//! `PASSIM_DATA_PATH`, `PASSIM_LOGGING_LEVEL`, `PASSIM_SEARCH_DEFAULT_LANGUAGE`.

use passim_core::{ConfigManager, Result};
use passim_fts::SearchConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassimConfig {
    /// JSON dataset loaded into the library at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,

    /// Search defaults and snippet options.
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging options.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ConfigManager for PassimConfig {
    fn project_name() -> &'static str {
        "passim"
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(path) = Self::env_value(DATA_PATH_VAR) {
            self.data_path = Some(path);
        }
        if let Some(level) = Self::env_value(LOGGING_LEVEL_VAR) {
            self.logging.level = level;
        }
        if let Some(language) = Self::env_value(DEFAULT_LANGUAGE_VAR) {
            self.search.default_language = language;
        }
        Ok(())
    }
}

const DATA_PATH_VAR: &str = "DATA_PATH";
const LOGGING_LEVEL_VAR: &str = "LOGGING_LEVEL";
const DEFAULT_LANGUAGE_VAR: &str = "SEARCH_DEFAULT_LANGUAGE";

// ============================================================================
// Tests
// ============================================================================
