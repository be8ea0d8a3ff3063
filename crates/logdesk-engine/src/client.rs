//! HTTP client for the web-log backend.
//!
//! Every call is single-shot: no retries, no timeout, no caching. Whatever
//! the transport reports is surfaced as a [`ClientError`].

use crate::chat::{AgentRequest, AgentResponse, InferRequest, InferResponse};
use crate::config::Config;
use crate::session::{SessionError, SessionIdStyle, SessionPolicy, SessionStore, SessionToken};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Path of the agent invocation endpoint.
pub const INVOKE_PATH: &str = "/web-log/invoke";

/// Path of the log query endpoint.
pub const INFER_PATH: &str = "/api/infer";

/// Anything that can answer a log query.
///
/// [`RequestClient`] is the real implementation; the conversation controller
/// is generic over this so it can be driven without a network.
pub trait QueryService {
    /// Error reported when the query fails.
    type Error: std::fmt::Display;

    /// Send `input` for the current session and return the full conversation.
    fn query_log(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<InferResponse, Self::Error>> + Send;
}

/// How the client obtains its session token.
#[derive(Debug)]
enum SessionSource {
    /// Generated at construction.
    Fixed(SessionToken),
    /// Read from (or created in) the session file on first use, then kept.
    Stored {
        store: SessionStore,
        style: SessionIdStyle,
        cached: Mutex<Option<SessionToken>>,
    },
}

/// Client for the web-log backend.
#[derive(Debug)]
pub struct RequestClient {
    base_url: String,
    http_client: Client,
    session: SessionSource,
}

impl RequestClient {
    /// Build a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let session = match config.session.policy {
            SessionPolicy::PerInstance => {
                SessionSource::Fixed(SessionToken::generate(config.session.id_style))
            }
            SessionPolicy::Persistent => match config.session.store() {
                Some(store) => SessionSource::Stored {
                    store,
                    style: config.session.id_style,
                    cached: Mutex::new(None),
                },
                None => {
                    warn!("No data directory available, session will not persist");
                    SessionSource::Fixed(SessionToken::generate(config.session.id_style))
                }
            },
        };

        let http_client = Client::builder()
            .user_agent(concat!("logdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            base_url: normalize_base_url(&config.base_url),
            http_client,
            session,
        })
    }

    /// Build a client with a fixed session token.
    pub fn with_session(base_url: &str, token: SessionToken) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .user_agent(concat!("logdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            http_client,
            session: SessionSource::Fixed(token),
        })
    }

    /// Get the base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session token that `query_log` sends, creating it if needed.
    pub fn session_id(&self) -> Result<SessionToken, ClientError> {
        match &self.session {
            SessionSource::Fixed(token) => Ok(token.clone()),
            SessionSource::Stored {
                store,
                style,
                cached,
            } => {
                let mut guard = cached.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(token) = guard.as_ref() {
                    return Ok(token.clone());
                }
                let token = store.load_or_create(*style)?;
                *guard = Some(token.clone());
                Ok(token)
            }
        }
    }

    /// Ask the agent directly, without a session.
    pub async fn invoke_agent(&self, input: &str) -> Result<AgentResponse, ClientError> {
        let body = AgentRequest {
            input: input.to_string(),
        };
        self.post_json(INVOKE_PATH, &body).await
    }

    /// Send a log query within the current session.
    pub async fn query_log(&self, input: &str) -> Result<InferResponse, ClientError> {
        let session_id = self.session_id()?;
        let body = InferRequest {
            input: input.to_string(),
            session_id: session_id.as_str().to_string(),
        };
        self.post_json(INFER_PATH, &body).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(ClientError::Http)?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

impl QueryService for RequestClient {
    type Error = ClientError;

    fn query_log(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<InferResponse, Self::Error>> + Send {
        RequestClient::query_log(self, input)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection or transport failure.
    #[error("{0}")]
    Http(#[source] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Session token could not be read or stored.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
