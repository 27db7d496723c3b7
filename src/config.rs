//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use oracle_chess_rules::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable that overrides the oracle URL from the file.
pub const ORACLE_URL_ENV: &str = "ORACLE_URL";

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "oracle_chess.toml";

/// Settings for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the move oracle.
    #[serde(default = "default_oracle_url")]
    oracle_url: String,

    /// Strength offset sent to the oracle; omitted when unset.
    #[serde(default)]
    difficulty: Option<u32>,

    /// Side the human plays.
    #[serde(default = "default_human_color")]
    human_color: Color,

    /// Per-request timeout in seconds. Unset waits indefinitely.
    #[serde(default)]
    request_timeout_secs: Option<u64>,

    /// File the terminal UI logs to.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_oracle_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_human_color() -> Color {
    Color::White
}

fn default_log_file() -> PathBuf {
    PathBuf::from("oracle_chess.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            oracle_url: default_oracle_url(),
            difficulty: None,
            human_color: default_human_color(),
            request_timeout_secs: None,
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(oracle_url = %config.oracle_url, human_color = %config.human_color, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise, then applies the
    /// environment override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };
        Ok(config.with_env_override(std::env::var(ORACLE_URL_ENV).ok()))
    }

    /// Replaces the oracle URL with `url` when set and not blank.
    pub fn with_env_override(self, url: Option<String>) -> Self {
        match url.filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                debug!(%url, "Oracle URL taken from environment");
                self.with_oracle_url(url)
            }
            None => self,
        }
    }

    /// Sets the oracle URL.
    pub fn with_oracle_url(mut self, url: impl Into<String>) -> Self {
        self.oracle_url = url.into();
        self
    }

    /// Sets the difficulty offset.
    pub fn with_difficulty(mut self, difficulty: Option<u32>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the human's side.
    pub fn with_human_color(mut self, color: Color) -> Self {
        self.human_color = color;
        self
    }

    /// Per-request timeout, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
