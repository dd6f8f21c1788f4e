use crate::editor::autosave::AutoSaveSettings;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::{Path, PathBuf};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Environment variable overriding the documents API base URL
pub const ENV_API_URL: &str = "XFDOCS_API_URL";
/// Environment variable overriding the auto-save debounce, in milliseconds
pub const ENV_AUTOSAVE_MS: &str = "XFDOCS_AUTOSAVE_MS";
/// Environment variable carrying a bearer token
pub const ENV_TOKEN: &str = "XFDOCS_TOKEN";

/// Editor configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
    token: Option<String>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app, token: None })
    }

    /// Defaults, then the user config file, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = default_config_path().filter(|path| path.exists());
        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Layer an optional TOML file and an environment lookup over the defaults
    pub fn from_sources(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut app = match file {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(url) = env(ENV_API_URL) {
            app.server_url = Some(url);
        }
        if let Some(raw) = env(ENV_AUTOSAVE_MS) {
            app.autosave_debounce_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "autosave_debounce_ms",
                message: format!("{} is not a number of milliseconds: {:?}", ENV_AUTOSAVE_MS, raw),
            })?;
        }
        app.validate()?;

        Ok(Self {
            app,
            token: env(ENV_TOKEN).filter(|t| !t.is_empty()),
        })
    }

    /// Set the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the bearer token
    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url().trim_end_matches('/'), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Auto-save pacing for new editor sessions
    pub fn autosave(&self) -> AutoSaveSettings {
        AutoSaveSettings::from(&self.app)
    }
}

/// `<config dir>/xfdocs/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("xfdocs").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.server_url(), "http://127.0.0.1:3000");
        assert!(config.get_token().is_none());
        assert_eq!(config.autosave().debounce, Duration::from_millis(2000));
    }

    #[test]
    fn test_set_token() {
        let mut config = Config::new();
        config.set_token(Some("test_token".to_string()));
        assert_eq!(config.get_token(), Some(&"test_token".to_string()));
        config.set_token(None);
        assert!(config.get_token().is_none());
    }

    #[test]
    fn test_api_url() {
        let config =
            Config::with_builder(AppConfig::builder().server_url("https://docs.test/")).unwrap();
        assert_eq!(
            config.api_url("/api/documents"),
            "https://docs.test/api/documents"
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = \"https://from-file.test\"").unwrap();
        writeln!(file, "autosave_debounce_ms = 1000").unwrap();

        let config = Config::from_sources(
            Some(file.path()),
            env_of(&[(ENV_AUTOSAVE_MS, "250"), (ENV_TOKEN, "secret")]),
        )
        .unwrap();

        assert_eq!(config.server_url(), "https://from-file.test");
        assert_eq!(config.autosave().debounce, Duration::from_millis(250));
        assert_eq!(config.get_token().map(String::as_str), Some("secret"));
    }

    #[test]
    fn test_env_rejects_garbage_debounce() {
        let result = Config::from_sources(None, env_of(&[(ENV_AUTOSAVE_MS, "soon")]));
        assert_matches!(result, Err(ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_env_url_is_validated() {
        let result = Config::from_sources(None, env_of(&[(ENV_API_URL, "localhost:3000")]));
        assert_matches!(result, Err(ConfigError::InvalidUrl(_)));
    }
}
