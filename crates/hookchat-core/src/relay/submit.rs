//! Submission pipeline: outbound request construction and ack classification.
//!
//! Stateless, like the other handlers in this crate: all logic lives in
//! associated functions. Log and busy-flag side effects are applied by the
//! conversation session, which calls into this module.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use hookchat_types::chat::ChatMessage;
use hookchat_types::error::RelayError;
use hookchat_types::relay::{
    CorrelationId, HistoryEntry, RelayResponse, ResponseBody, SubmitRequest,
};

/// JSON field of the submit ack carrying the correlation id.
const CORRELATION_FIELD: &str = "messageId";

/// How the submit endpoint chose to answer an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Reply will be available later under this id.
    Correlated(CorrelationId),
    /// The endpoint answered synchronously with the final reply text.
    Inline(String),
}

pub struct SubmissionPipeline;

impl SubmissionPipeline {
    /// Whether `text` is worth submitting. Whitespace-only input is not.
    pub fn accepts(text: &str) -> bool {
        !text.trim().is_empty()
    }

    /// Build the outbound request stamped with the current time.
    ///
    /// `history` is the conversation *before* `text` is appended.
    pub fn build_request(text: &str, history: &[ChatMessage]) -> SubmitRequest {
        Self::build_request_at(text, history, Utc::now())
    }

    pub fn build_request_at(
        text: &str,
        history: &[ChatMessage],
        at: DateTime<Utc>,
    ) -> SubmitRequest {
        SubmitRequest {
            message: text.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            conversation_history: history.iter().map(HistoryEntry::from).collect(),
        }
    }

    /// Interpret the submit endpoint's response.
    ///
    /// - non-2xx: [`RelayError::Rejected`] with the status category
    /// - JSON with a correlation id: [`SubmissionOutcome::Correlated`]
    /// - JSON without one: [`RelayError::MissingCorrelationId`]
    /// - plain text: [`SubmissionOutcome::Inline`] with the raw body
    pub fn classify(response: RelayResponse) -> Result<SubmissionOutcome, RelayError> {
        if !response.is_success() {
            return Err(RelayError::rejected(response.status));
        }

        match response.body {
            ResponseBody::Text(text) => Ok(SubmissionOutcome::Inline(text)),
            ResponseBody::Json(value) => correlation_id(&value)
                .map(SubmissionOutcome::Correlated)
                .ok_or(RelayError::MissingCorrelationId),
        }
    }
}

/// Pull the correlation id out of a JSON ack. Numeric ids are accepted.
fn correlation_id(value: &Value) -> Option<CorrelationId> {
    match value.get(CORRELATION_FIELD)? {
        Value::String(id) => CorrelationId::new(id.clone()),
        Value::Number(id) => CorrelationId::new(id.to_string()),
        _ => None,
    }
}
