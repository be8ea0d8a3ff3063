//! Configuration types for the logdesk engine.
//!
//! This module defines the configuration schema: backend location, session
//! policy, input debounce window and display language.

use crate::locale::Locale;
use crate::session::{SessionIdStyle, SessionPolicy, SessionStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides [`Config::base_url`].
pub const BASE_URL_ENV: &str = "LOGDESK_BASE_URL";

/// Main configuration for logdesk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend, e.g. `http://127.0.0.1:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session token handling.
    #[serde(default)]
    pub session: SessionConfig,

    /// Window after an IME composition ends during which Enter is ignored.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Language for synthesized transcript entries.
    #[serde(default)]
    pub locale: Locale,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_debounce_ms() -> u64 {
    50
}

/// Session token configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Where the token comes from.
    #[serde(default)]
    pub policy: SessionPolicy,

    /// Format of newly created tokens.
    #[serde(default)]
    pub id_style: SessionIdStyle,

    /// Session file override. Defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolve the session file location.
    pub fn store(&self) -> Option<SessionStore> {
        self.path
            .clone()
            .or_else(SessionStore::default_path)
            .map(SessionStore::new)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default location: `<config_dir>/logdesk/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logdesk").join("config.json"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
    }

    /// Replace the base URL when an override is present and non-blank.
    pub fn apply_base_url_override(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
    }

    /// Debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session: SessionConfig::default(),
            debounce_ms: default_debounce_ms(),
            locale: Locale::default(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.session.policy, SessionPolicy::Persistent);
        assert_eq!(config.session.id_style, SessionIdStyle::Timestamp);
        assert_eq!(config.locale, Locale::ZhTw);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"base_url": "http://logs.internal:9000"}"#).unwrap();
        assert_eq!(config.base_url, "http://logs.internal:9000");
        assert_eq!(config.debounce_ms, 50);
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_session_policy_names() {
        let config: Config = serde_json::from_str(
            r#"{"session": {"policy": "per_instance", "id_style": "uuid"}, "locale": "en"}"#,
        )
        .unwrap();
        assert_eq!(config.session.policy, SessionPolicy::PerInstance);
        assert_eq!(config.session.id_style, SessionIdStyle::Uuid);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logdesk").join("config.json");

        let mut config = Config::default();
        config.session.path = Some(temp.path().join("session.json"));
        config.debounce_ms = 80;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::default();
        config.apply_base_url_override(Some("   ".into()));
        assert_eq!(config.base_url, "http://127.0.0.1:8000");

        config.apply_base_url_override(Some(" http://10.0.0.5:8000/ ".into()));
        assert_eq!(config.base_url, "http://10.0.0.5:8000/");

        config.apply_base_url_override(None);
        assert_eq!(config.base_url, "http://10.0.0.5:8000/");
    }

    #[test]
    fn test_session_store_override() {
        let config = SessionConfig {
            path: Some(PathBuf::from("/tmp/custom-session.json")),
            ..SessionConfig::default()
        };
        let store = config.store().unwrap();
        assert_eq!(store.path(), Path::new("/tmp/custom-session.json"));
    }
}
