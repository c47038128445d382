//! Wire types for the relay endpoint.
//!
//! The relay is an external automation service exposing two HTTP endpoints:
//! a submit endpoint that accepts a message plus conversation history, and a
//! status endpoint that is polled with the correlation id the submit
//! endpoint handed back.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::chat::{ChatMessage, MessageRole};

/// Body of `POST <submit-endpoint>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub message: String,
    /// ISO 8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub conversation_history: Vec<HistoryEntry>,
}

/// One prior message as sent in `conversation_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

/// Opaque token identifying one outstanding request/reply pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap a raw id. Returns `None` for an empty string.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A response body, tagged by how the endpoint declared it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `Content-Type` contained `application/json` and the body parsed.
    Json(serde_json::Value),
    /// Anything else, kept verbatim.
    Text(String),
}

/// Status code plus parsed body of one relay HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl RelayResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(value),
        }
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Text(text.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where a resolved status body keeps the reply text:
/// `{"response": {"content": "..."}}`. Any other field may be absent or of
/// any type.
pub const REPLY_CONTENT_POINTER: &str = "/response/content";

/// Optional error detail next to the reply text.
pub const REPLY_ERROR_POINTER: &str = "/response/error";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_request_wire_shape() {
        let request = SubmitRequest {
            message: "hello".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            conversation_history: vec![
                HistoryEntry::from(&ChatMessage::assistant("Hi!")),
                HistoryEntry::from(&ChatMessage::user("earlier")),
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "hello",
                "timestamp": "2026-01-01T00:00:00.000Z",
                "conversation_history": [
                    {"role": "assistant", "content": "Hi!"},
                    {"role": "user", "content": "earlier"}
                ]
            })
        );
    }

    #[test]
    fn test_correlation_id_rejects_empty() {
        assert!(CorrelationId::new("").is_none());
        assert_eq!(CorrelationId::new("m1").unwrap().as_str(), "m1");
    }

    #[test]
    fn test_relay_response_success_range() {
        assert!(RelayResponse::text(200, "ok").is_success());
        assert!(RelayResponse::text(202, "").is_success());
        assert!(!RelayResponse::text(302, "").is_success());
        assert!(!RelayResponse::text(429, "").is_success());
    }
}
