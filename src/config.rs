//! Application configuration for Shelfmark.
//!
//! Settings are stored as a JSON file; a missing file yields defaults so a
//! fresh checkout runs against the embedded local store.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::errors::ConfigError;

/// Connection settings for the remote backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_key: String,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Path of the embedded SQLite database used by the local store.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Remote backend; `None` keeps everything on the local store.
    #[serde(default)]
    pub remote: Option<RemoteSettings>,
}

fn default_database_path() -> String {
    "shelfmark.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            remote: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the JSON file at `path`.
    ///
    /// A missing file returns defaults; a malformed file is an error rather
    /// than silently falling back.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config file: {}", e)))
    }

    /// Saves the configuration as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config file: {}", e)))
    }
}
