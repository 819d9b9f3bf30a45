//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use xoox_engine::MatchTiming;

/// Environment variable that overrides the database path.
pub const DB_PATH_ENV: &str = "XOOX_DB_PATH";

/// Config file read when no path is given and the file exists.
const DEFAULT_CONFIG_FILE: &str = "xoox.toml";

/// Application settings, read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file holding the leaderboard.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Delay before the AI replies, in milliseconds.
    #[serde(default = "default_ai_delay_ms")]
    ai_delay_ms: u64,

    /// Match clock period, in milliseconds.
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,

    /// Rows shown by the ranking view.
    #[serde(default = "default_leaderboard_limit")]
    leaderboard_limit: usize,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_db_path() -> String {
    "game-xoox.db".to_string()
}

fn default_ai_delay_ms() -> u64 {
    500
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_leaderboard_limit() -> usize {
    5
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            ai_delay_ms: default_ai_delay_ms(),
            tick_ms: default_tick_ms(),
            leaderboard_limit: default_leaderboard_limit(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.tick_ms == 0 {
            return Err(ConfigError::new("tick_ms must be greater than zero"));
        }
        Ok(config)
    }

    /// Resolves the configuration for a run.
    ///
    /// An explicit `path` must exist. Without one, `xoox.toml` in the working
    /// directory is used when present, otherwise defaults. The
    /// [`DB_PATH_ENV`] variable then overrides the database path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file cannot be read or parsed.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        let config = config.with_db_path(std::env::var(DB_PATH_ENV).ok());
        info!(db_path = %config.db_path, "Config loaded");
        Ok(config)
    }

    /// Replaces the database path when `db_path` is given.
    pub fn with_db_path(mut self, db_path: Option<String>) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        self
    }

    /// Scheduling delays for the match runner.
    pub fn timing(&self) -> MatchTiming {
        MatchTiming::new(
            Duration::from_millis(self.ai_delay_ms),
            Duration::from_millis(self.tick_ms),
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
