//! Chat records and the wire types exchanged with the web-log backend.
//!
//! Two endpoints are spoken:
//! - `POST <base>/api/infer` with [`InferRequest`], answered by [`InferResponse`]
//! - `POST <base>/web-log/invoke` with [`AgentRequest`], answered by [`AgentResponse`]

use serde::{Deserialize, Serialize};

/// Role string used for messages typed by the user.
pub const ROLE_USER: &str = "user";

/// Role string used for messages produced by the agent.
pub const ROLE_ASSISTANT: &str = "assistant";

/// A single turn in the conversation.
///
/// Roles are kept as free-form strings because the backend may send roles
/// beyond `user` and `assistant` (for example `system` or `tool`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: String,
    /// Message content. The backend sends `null` for turns without text.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.into(),
            content: Some(content.into()),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_ASSISTANT.into(),
            content: Some(content.into()),
        }
    }

    /// Whether this message was authored by the user.
    pub fn is_user(&self) -> bool {
        self.role == ROLE_USER
    }

    /// Content as a string slice, empty when absent.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Body of `POST /api/infer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferRequest {
    pub input: String,
    pub session_id: String,
}

/// Response of `POST /api/infer`: the authoritative conversation so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferResponse {
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /web-log/invoke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub input: String,
}

/// A tool invocation reported by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallInfo {
    /// Tool name.
    pub name: String,
    /// Arguments, passed through untouched.
    #[serde(default)]
    pub args: serde_json::Value,
    /// Call identifier, when the agent assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// One entry of the agent's full message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    /// Message kind as reported by the agent (`human`, `ai`, `tool`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallInfo>>,
}

/// Response of `POST /web-log/invoke`.
///
/// Only the CLI prints this; the conversation controller never merges
/// `all_contents` into the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    pub all_contents: Vec<MessageInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_message_creation() {
        let user_msg = ChatMessage::user("Hello");
        assert_eq!(user_msg.role, "user");
        assert_eq!(user_msg.content.as_deref(), Some("Hello"));
        assert!(user_msg.is_user());

        let assistant_msg = ChatMessage::assistant("Hi there!");
        assert_eq!(assistant_msg.role, "assistant");
        assert!(!assistant_msg.is_user());
    }

    #[test]
    fn test_null_content_reads_as_empty() {
        let msg: ChatMessage = serde_json::from_value(json!({"role": "tool", "content": null}))
            .unwrap();
        assert_eq!(msg.content, None);
        assert_eq!(msg.text(), "");
    }

    #[test]
    fn test_infer_request_shape() {
        let body = InferRequest {
            input: "show 404s".into(),
            session_id: "1700000000000".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"input": "show 404s", "session_id": "1700000000000"})
        );
    }

    #[test]
    fn test_agent_response_with_tool_calls() {
        let raw = json!({
            "response": "Found 3 entries",
            "all_contents": [
                {"type": "human", "content": "find 500 errors"},
                {
                    "type": "ai",
                    "content": null,
                    "tool_calls": [
                        {"name": "filter_logs", "args": {"status_code": "500"}, "tool_call_id": "call_1"}
                    ]
                },
                {"type": "tool", "content": "3 lines", "tool_calls": null}
            ]
        });

        let parsed: AgentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.response, "Found 3 entries");
        assert_eq!(parsed.all_contents.len(), 3);
        assert_eq!(parsed.all_contents[0].kind, "human");

        let calls = parsed.all_contents[1].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].name, "filter_logs");
        assert_eq!(calls[0].args["status_code"], "500");
        assert_eq!(calls[0].tool_call_id.as_deref(), Some("call_1"));
        assert!(parsed.all_contents[2].tool_calls.is_none());
    }

    #[test]
    fn test_tool_call_without_id() {
        let call: ToolCallInfo =
            serde_json::from_value(json!({"name": "add", "args": [1, 2]})).unwrap();
        assert!(call.tool_call_id.is_none());
        assert_eq!(call.args, json!([1, 2]));
    }

    #[test]
    fn test_responses_require_their_payload_field() {
        assert!(serde_json::from_value::<InferResponse>(json!({"detail": "graph error"})).is_err());
        assert!(serde_json::from_value::<AgentResponse>(json!({"response": "done"})).is_err());

        let empty: InferResponse = serde_json::from_value(json!({"messages": []})).unwrap();
        assert!(empty.messages.is_empty());
    }
}
