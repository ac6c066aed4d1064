//! Traits shared by Passim crates.
//!
//! [`ConfigManager`] is implemented by application configuration types; the
//! CLI's `config` subcommands are written generically against it.

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// A loadable, serializable application configuration.
///
/// Resolution order for the configuration file is: explicit path, then the
/// `<PROJECT>_CONFIG` environment variable, then
/// `<config_dir>/<project>/config.toml`.
pub trait ConfigManager: Default + Serialize + DeserializeOwned + Sized {
    /// Short project name, used for the config directory and env prefix.
    fn project_name() -> &'static str;

    /// Prefix for environment overrides, e.g. `PASSIM`.
    fn env_prefix() -> String {
        Self::project_name().to_uppercase().replace('-', "_")
    }

    /// Full environment variable name for `suffix`.
    ///
    /// ```
    /// # use passim_core::ConfigManager;
    /// # #[derive(Default, serde::Serialize, serde::Deserialize)]
    /// # struct Demo;
    /// # impl ConfigManager for Demo {
    /// #     fn project_name() -> &'static str { "passim" }
    /// # }
    /// assert_eq!(Demo::env_var("DATA_PATH"), "PASSIM_DATA_PATH");
    /// ```
    fn env_var(suffix: &str) -> String {
        format!("{}_{}", Self::env_prefix(), suffix)
    }

    /// Value of the `suffix` environment variable, if set and non-empty.
    fn env_value(suffix: &str) -> Option<String> {
        env::var(Self::env_var(suffix))
            .ok()
            .filter(|value| !value.is_empty())
    }

    /// Platform default config file location.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolves the config file path from an explicit path, the environment,
    /// or the platform default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        Self::env_value("CONFIG")
            .map(PathBuf::from)
            .or_else(Self::default_config_path)
    }

    /// Loads the configuration. A missing file yields defaults; environment
    /// overrides are applied last.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                let config: Self = toml::from_str(&content).map_err(|e| {
                    Error::config(format!("Failed to parse {}: {e}", path.display()))
                })?;
                log::debug!("Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                log::debug!(
                    "No configuration at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Applies `<PREFIX>_*` environment overrides in place.
    fn apply_env_overrides(&mut self) -> Result<()> {
        Ok(())
    }

    /// Serializes the configuration as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flattens the configuration into `PREFIX_SECTION_KEY=value` pairs.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&Self::env_prefix(), &value, &mut vars);
        Ok(vars)
    }
}

fn flatten_env(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let name = format!("{prefix}_{}", key.to_uppercase().replace('-', "_"));
                flatten_env(&name, child, out);
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|v| match v {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
