mod defaults;
mod settings;

#[cfg(test)]
mod tests;

pub use defaults::{ENV_MS_CLIENT_ID, ENV_MS_CLIENT_SECRET};
pub use settings::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::PolyglotError;
use defaults::*;

/// Top-level Polyglot configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub polyglot: GeneralConfig,
    pub settings: Settings,
    pub console: ConsoleConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write logs to this file when set.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Console host config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Characters that mark a chat line as a bot command.
    #[serde(default = "default_command_prefixes")]
    pub command_prefixes: Vec<char>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            command_prefixes: default_command_prefixes(),
        }
    }
}

impl Config {
    /// Build a config from a parsed TOML document.
    ///
    /// A malformed `[polyglot]` or `[console]` table falls back to its
    /// defaults as a whole; `[settings]` falls back field by field.
    pub fn from_table(table: &toml::Table) -> Self {
        Self {
            polyglot: general_section(table),
            settings: Settings::from_table(table),
            console: section_or_default(table, "console"),
        }
    }
}

fn section_or_default<T>(table: &toml::Table, name: &str) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match table.get(name) {
        None => T::default(),
        Some(value) => value.clone().try_into().unwrap_or_else(|e| {
            warn!("invalid [{name}] section, using defaults: {e}");
            T::default()
        }),
    }
}

/// The `[polyglot]` section alone, for setting up logging before the rest
/// of the config is read.
pub fn general_section(table: &toml::Table) -> GeneralConfig {
    section_or_default(table, "polyglot")
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, PolyglotError> {
    read_table(path).map(|table| Config::from_table(&table))
}

/// Read and parse a TOML file without interpreting it. A missing file reads
/// as an empty document.
pub fn read_table(path: &str) -> Result<toml::Table, PolyglotError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(toml::Table::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PolyglotError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    content
        .parse()
        .map_err(|e| PolyglotError::Config(format!("failed to parse config: {}", e)))
}
