//! Correlation poller.
//!
//! Given a correlation id, queries the status endpoint at a fixed interval
//! until the reply is ready, the endpoint fails, or the retry budget runs
//! out. The decision for each observation is a pure function
//! ([`evaluate`]) so the state machine can be exercised without timers or
//! I/O; [`CorrelationPoller::poll`] is the async driver around it.

use std::time::Duration;

use tracing::{debug, info, warn};

use hookchat_types::config::ClientConfig;
use hookchat_types::error::RelayError;
use serde_json::Value;

use hookchat_types::relay::{
    CorrelationId, REPLY_CONTENT_POINTER, REPLY_ERROR_POINTER, RelayResponse, ResponseBody,
};

use super::transport::RelayTransport;

/// Status code meaning "still processing, ask again".
pub const STATUS_PENDING: u16 = 202;

pub const TIMEOUT_MESSAGE: &str =
    "I apologize, but I didn't receive a response in time. Please try again.";
pub const UNREADABLE_MESSAGE: &str = "I apologize, but I couldn't understand your request.";
pub const FAILURE_MESSAGE: &str =
    "I apologize, but I encountered an error while processing your request.";

/// Timing and retry budget for one poll sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between consecutive status queries.
    pub interval: Duration,
    /// Highest retry count that still issues a query.
    pub max_retries: u32,
}

impl PollPolicy {
    /// Whether a sequence at `retry` has run out of budget.
    ///
    /// The retry counter saturates, so `u32::MAX` is always exhausted even
    /// when `max_retries` is `u32::MAX`.
    pub fn is_exhausted(&self, retry: u32) -> bool {
        retry > self.max_retries || retry == u32::MAX
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1_000),
            max_retries: 30,
        }
    }
}

impl From<&ClientConfig> for PollPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_retries: config.max_poll_retries,
        }
    }
}

/// Terminal result of a poll sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The endpoint produced reply content.
    Resolved(String),
    /// The endpoint answered but no content could be extracted.
    Unreadable,
    /// Transport error or non-2xx status.
    Failed(RelayError),
    /// Retry budget exhausted while still pending.
    Exhausted,
}

impl PollOutcome {
    /// Text to append to the conversation for this outcome.
    pub fn into_reply(self) -> String {
        match self {
            PollOutcome::Resolved(content) => content,
            PollOutcome::Unreadable => UNREADABLE_MESSAGE.to_string(),
            PollOutcome::Failed(_) => FAILURE_MESSAGE.to_string(),
            PollOutcome::Exhausted => TIMEOUT_MESSAGE.to_string(),
        }
    }
}

/// What to do after one status observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Wait one interval, then query again at `next_retry`.
    Pending { next_retry: u32 },
    /// Stop with this outcome.
    Done(PollOutcome),
}

/// Decide the next step from the observation made at `retry`.
pub fn evaluate(retry: u32, observation: Result<RelayResponse, RelayError>) -> PollStep {
    let response = match observation {
        Ok(response) => response,
        Err(err) => return PollStep::Done(PollOutcome::Failed(err)),
    };

    if response.status == STATUS_PENDING {
        return PollStep::Pending {
            next_retry: retry.saturating_add(1),
        };
    }

    if !response.is_success() {
        return PollStep::Done(PollOutcome::Failed(RelayError::rejected(response.status)));
    }

    match extract_reply_content(response.body) {
        Some(content) => PollStep::Done(PollOutcome::Resolved(content)),
        None => PollStep::Done(PollOutcome::Unreadable),
    }
}

/// Reply text from a resolved status body.
///
/// JSON bodies carry it at `response.content`, read leniently: whatever
/// else the body holds, a non-empty string there is the reply. Text bodies
/// are the reply.
pub fn extract_reply_content(body: ResponseBody) -> Option<String> {
    let content = match body {
        ResponseBody::Text(text) => Some(text),
        ResponseBody::Json(value) => {
            if let Some(error) = value.pointer(REPLY_ERROR_POINTER).filter(|e| !e.is_null()) {
                warn!(%error, "relay reported an error alongside its reply");
            }
            value
                .pointer(REPLY_CONTENT_POINTER)
                .and_then(Value::as_str)
                .map(str::to_owned)
        }
    };
    content.filter(|text| !text.is_empty())
}

/// Async driver for one poll sequence.
pub struct CorrelationPoller<'a, T: RelayTransport> {
    transport: &'a T,
    policy: PollPolicy,
}

impl<'a, T: RelayTransport> CorrelationPoller<'a, T> {
    pub fn new(transport: &'a T, policy: PollPolicy) -> Self {
        Self { transport, policy }
    }

    /// Poll until a terminal outcome.
    ///
    /// Issues at most `max_retries + 1` status queries spaced by the policy
    /// interval. Cancellation is by dropping the returned future.
    pub async fn poll(&self, correlation_id: &CorrelationId) -> PollOutcome {
        let mut retry = 0;
        loop {
            if self.policy.is_exhausted(retry) {
                warn!(%correlation_id, retry, "gave up waiting for relay reply");
                return PollOutcome::Exhausted;
            }

            let observation = self.transport.status(correlation_id).await;
            match evaluate(retry, observation) {
                PollStep::Pending { next_retry } => {
                    debug!(%correlation_id, retry, "reply still processing");
                    tokio::time::sleep(self.policy.interval).await;
                    retry = next_retry;
                }
                PollStep::Done(outcome) => {
                    match &outcome {
                        PollOutcome::Failed(err) => {
                            warn!(%correlation_id, retry, error = %err, "status query failed");
                        }
                        _ => info!(%correlation_id, retry, "relay reply resolved"),
                    }
                    return outcome;
                }
            }
        }
    }
}
