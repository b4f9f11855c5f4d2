use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/nearboard/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Directory holding the config file and the stored credential.
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("nearboard")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The API base URL is an absolute http(s) URL
    /// - Timeouts, radius, stop count and refresh interval are non-zero
    /// - At least one stop type is queried
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.api.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid(format!(
                "api.base_url '{}' must start with http:// or https://",
                base_url
            )));
        }
        if self.api.timeout_seconds == 0 || self.api.connect_timeout_seconds == 0 {
            return Err(invalid("api timeouts must be greater than zero"));
        }
        if self.api.radius_meters == 0 {
            return Err(invalid("api.radius_meters must be greater than zero"));
        }
        if self.api.max_stops == 0 {
            return Err(invalid("api.max_stops must be greater than zero"));
        }
        if self.api.stop_types.iter().all(|t| t.trim().is_empty()) {
            return Err(invalid("api.stop_types must name at least one stop type"));
        }
        if self.refresh.interval_seconds == 0 {
            return Err(invalid("refresh.interval_seconds must be greater than zero"));
        }
        if self.location.timeout_seconds == 0 {
            return Err(invalid("location.timeout_seconds must be greater than zero"));
        }
        if !(-90.0..=90.0).contains(&self.location.test_latitude)
            || !(-180.0..=180.0).contains(&self.location.test_longitude)
        {
            return Err(invalid("location test coordinate is out of range"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        message: message.into(),
    }
}
