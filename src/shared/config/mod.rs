//! Application configuration module
//!
//! Provides the configuration shared by every editor session: where the
//! documents API lives and how auto-save is paced. Values come from a builder
//! or a TOML file; `validate` is applied on both paths.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default debounce between the last edit and an auto-save
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 2000;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
    /// Quiet period before an auto-save fires
    pub autosave_debounce_ms: u64,
    /// Upper bound on one save request; none means wait for the server
    pub autosave_timeout_ms: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            autosave_timeout_ms: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.autosave_debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "autosave_debounce_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.autosave_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "autosave_timeout_ms",
                message: "must be greater than zero when set".to_string(),
            });
        }
        Ok(())
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn autosave_timeout(&self) -> Option<Duration> {
        self.autosave_timeout_ms.map(Duration::from_millis)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    autosave_debounce_ms: Option<u64>,
    autosave_timeout_ms: Option<u64>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the auto-save debounce in milliseconds
    pub fn autosave_debounce_ms(mut self, ms: u64) -> Self {
        self.autosave_debounce_ms = Some(ms);
        self
    }

    /// Set the per-save timeout in milliseconds
    pub fn autosave_timeout_ms(mut self, ms: u64) -> Self {
        self.autosave_timeout_ms = Some(ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url,
            autosave_debounce_ms: self
                .autosave_debounce_ms
                .unwrap_or(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            autosave_timeout_ms: self.autosave_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to read config: {0}")]
    Io(String),
}
