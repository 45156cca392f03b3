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
    /// `~/.config/wiretree/config.toml` or the platform equivalent.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("wiretree").join("config.toml")
    }

    /// Load the default config file, or defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate an explicit file. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
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

    /// Checks:
    /// - `server.bind_addr` parses as a socket address
    /// - `server.mount_id` is not empty
    /// - `server.keepalive_seconds` and `server.session_ttl_seconds` are positive
    /// - `client.debounce_ms` is positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.socket_addr().is_none() {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid bind address '{}'", self.server.bind_addr),
            });
        }

        if self.server.mount_id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "server.mount_id must not be empty".to_string(),
            });
        }

        if self.server.keepalive_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "server.keepalive_seconds must be greater than 0".to_string(),
            });
        }

        if self.server.session_ttl_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "server.session_ttl_seconds must be greater than 0".to_string(),
            });
        }

        if self.client.debounce_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "client.debounce_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
