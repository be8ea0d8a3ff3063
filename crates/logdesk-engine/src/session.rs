//! Session token handling.
//!
//! The backend keys conversation history by `session_id`. A token is created
//! once and then reused unchanged for every `query_log` call. Where it lives
//! depends on [`SessionPolicy`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the session token comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Read from the session file, creating and storing one on first use.
    #[default]
    Persistent,
    /// Generate a token when the client is built; never written to disk.
    PerInstance,
}

/// Format of newly generated tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionIdStyle {
    /// Current Unix time in milliseconds. Low entropy, not a secret.
    #[default]
    Timestamp,
    /// Random v4 UUID.
    Uuid,
}

/// An opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token in the given style.
    pub fn generate(style: SessionIdStyle) -> Self {
        match style {
            SessionIdStyle::Timestamp => Self(chrono::Utc::now().timestamp_millis().to_string()),
            SessionIdStyle::Uuid => Self(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk layout of the session file: a single named slot.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    session_id: SessionToken,
}

/// File-backed storage for one session token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `<data_dir>/logdesk/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("logdesk").join("session.json"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token, if any.
    pub fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(SessionError::Io)?;
        let file: SessionFile = serde_json::from_str(&content).map_err(SessionError::Parse)?;
        if file.session_id.as_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(file.session_id))
    }

    /// Store a token, replacing any previous one.
    pub fn store(&self, token: &SessionToken) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(SessionError::Io)?;
        }
        let file = SessionFile {
            session_id: token.clone(),
        };
        let content = serde_json::to_string_pretty(&file).map_err(SessionError::Serialize)?;
        std::fs::write(&self.path, content).map_err(SessionError::Io)
    }

    /// Return the stored token, creating and storing one if absent.
    pub fn load_or_create(&self, style: SessionIdStyle) -> Result<SessionToken, SessionError> {
        if let Some(token) = self.load()? {
            return Ok(token);
        }
        let token = SessionToken::generate(style);
        self.store(&token)?;
        info!(session_id = %token, path = %self.path.display(), "Created new session");
        Ok(token)
    }

    /// Delete the stored token. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}

/// Errors that can occur when reading or writing the session file.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Session could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_timestamp_token_is_numeric() {
        let token = SessionToken::generate(SessionIdStyle::Timestamp);
        assert!(!token.as_str().is_empty());
        assert!(token.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_uuid_token_parses() {
        let token = SessionToken::generate(SessionIdStyle::Uuid);
        assert!(uuid::Uuid::parse_str(token.as_str()).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_or_create_is_stable() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("nested").join("session.json"));

        let first = store.load_or_create(SessionIdStyle::Timestamp).unwrap();
        let second = store.load_or_create(SessionIdStyle::Uuid).unwrap();
        assert_eq!(first, second);
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_layout() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        store.store(&SessionToken::new("abc")).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["session_id"], "abc");
    }

    #[test]
    fn test_empty_slot_is_treated_as_missing() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        std::fs::write(store.path(), r#"{"session_id": ""}"#).unwrap();

        assert!(store.load().unwrap().is_none());
        let created = store.load_or_create(SessionIdStyle::Timestamp).unwrap();
        assert!(!created.as_str().is_empty());
    }

    #[test]
    fn test_clear() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        assert!(!store.clear().unwrap());

        store.store(&SessionToken::new("abc")).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(SessionError::Parse(_))));
    }
}
