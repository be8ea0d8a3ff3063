//! logdesk-engine: Headless engine for the web-log agent client
//!
//! This crate provides everything below the terminal UI:
//! - Wire types for the `/api/infer` and `/web-log/invoke` endpoints
//! - Session token creation and persistence
//! - The HTTP request client
//! - The conversation controller with its IME debounce guard
//! - Configuration

pub mod chat;
pub mod client;
pub mod config;
pub mod conversation;
pub mod debounce;
pub mod input;
pub mod locale;
pub mod session;

// Re-export commonly used types
pub use chat::{
    AgentRequest, AgentResponse, ChatMessage, InferRequest, InferResponse, MessageInfo,
    ToolCallInfo, ROLE_ASSISTANT, ROLE_USER,
};
pub use client::{ClientError, QueryService, RequestClient, INFER_PATH, INVOKE_PATH};
pub use config::{Config, ConfigError, SessionConfig, BASE_URL_ENV};
pub use conversation::{Conversation, PendingQuery, Phase, SubmitOutcome};
pub use debounce::Debounce;
pub use input::InputBuffer;
pub use locale::Locale;
pub use session::{SessionError, SessionIdStyle, SessionPolicy, SessionStore, SessionToken};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
