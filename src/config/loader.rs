//! Configuration file loading with precedence handling.

use crate::model::ContactOrder;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHATMUX_CONFIG";

/// Environment variable overriding the history database path.
pub const DATABASE_ENV: &str = "CHATMUX_DB";

/// Environment variable overriding the media downloads directory.
pub const DOWNLOADS_ENV: &str = "CHATMUX_DOWNLOADS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A numeric setting is outside its allowed range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chatmux/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// SQLite history database.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory downloaded media is written to.
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,

    /// Messages loaded per conversation on first visit.
    #[serde(default)]
    pub history_window: Option<usize>,

    /// Conversations seeded from history at startup.
    #[serde(default)]
    pub recent_conversations: Option<usize>,

    /// Maximum length of the message being typed, in characters.
    #[serde(default)]
    pub input_char_limit: Option<usize>,

    /// Caret blink interval.
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,

    /// Conversation list ordering.
    #[serde(default)]
    pub contact_order: Option<ContactOrder>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// SQLite history database.
    pub database_path: PathBuf,
    /// Directory downloaded media is written to.
    pub downloads_dir: PathBuf,
    /// Messages loaded per conversation on first visit.
    pub history_window: usize,
    /// Conversations seeded from history at startup.
    pub recent_conversations: usize,
    /// Maximum length of the message being typed, in characters.
    pub input_char_limit: usize,
    /// Caret blink interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Conversation list ordering.
    pub contact_order: ContactOrder,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl ResolvedConfig {
    /// Caret blink interval.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject values the session cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for zero windows, limits, or intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("history_window", self.history_window as u64),
            ("input_char_limit", self.input_char_limit as u64),
            ("tick_interval_ms", self.tick_interval_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            downloads_dir: PathBuf::from("downloads"),
            history_window: 100,
            recent_conversations: 20,
            input_char_limit: 1000,
            tick_interval_ms: 500,
            contact_order: ContactOrder::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chatmux/chatmux.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chatmux").join("chatmux.log")
    } else {
        PathBuf::from("chatmux.log")
    }
}

/// Resolve default history database path.
///
/// Returns `~/.local/share/chatmux/chatmux.db` on Unix-like systems, falling
/// back to the current directory.
pub fn default_database_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("chatmux").join("chatmux.db")
    } else {
        PathBuf::from("chatmux.db")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/chatmux/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatmux").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CHATMUX_CONFIG` environment variable
/// 3. Default path `~/.config/chatmux/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CHATMUX_DB`: Override database path
/// - `CHATMUX_DOWNLOADS`: Override downloads directory
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(db) = std::env::var(DATABASE_ENV) {
        config.database_path = PathBuf::from(db);
    }

    if let Ok(downloads) = std::env::var(DOWNLOADS_ENV) {
        config.downloads_dir = PathBuf::from(downloads);
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        database_path: config.database_path.unwrap_or(defaults.database_path),
        downloads_dir: config.downloads_dir.unwrap_or(defaults.downloads_dir),
        history_window: config.history_window.unwrap_or(defaults.history_window),
        recent_conversations: config
            .recent_conversations
            .unwrap_or(defaults.recent_conversations),
        input_char_limit: config.input_char_limit.unwrap_or(defaults.input_char_limit),
        tick_interval_ms: config.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
        contact_order: config.contact_order.unwrap_or(defaults.contact_order),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    database_override: Option<PathBuf>,
    downloads_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(db) = database_override {
        config.database_path = db;
    }

    if let Some(downloads) = downloads_override {
        config.downloads_dir = downloads;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
