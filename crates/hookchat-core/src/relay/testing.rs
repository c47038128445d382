//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use hookchat_types::error::RelayError;
use hookchat_types::relay::{CorrelationId, RelayResponse, SubmitRequest};

use super::transport::RelayTransport;

type Reply = Result<RelayResponse, RelayError>;

#[derive(Default)]
struct Script {
    submit_replies: Mutex<VecDeque<Reply>>,
    status_replies: Mutex<VecDeque<Reply>>,
    submitted: Mutex<Vec<SubmitRequest>>,
    polled: Mutex<Vec<String>>,
    status_calls: AtomicU32,
}

/// Answers from queues filled by the test.
///
/// An empty submit queue answers a plain-text "ok"; an empty status queue
/// answers 202 so unscripted polls stay pending. Clones share the script.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Script>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submit(&self, reply: Reply) {
        self.script.submit_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_status(&self, reply: Reply) {
        self.script.status_replies.lock().unwrap().push_back(reply);
    }

    pub fn submitted(&self) -> Vec<SubmitRequest> {
        self.script.submitted.lock().unwrap().clone()
    }

    pub fn polled_ids(&self) -> Vec<String> {
        self.script.polled.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> u32 {
        self.script.status_calls.load(Ordering::SeqCst)
    }
}

impl RelayTransport for ScriptedTransport {
    async fn submit(&self, request: &SubmitRequest) -> Result<RelayResponse, RelayError> {
        self.script.submitted.lock().unwrap().push(request.clone());
        let next = self.script.submit_replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(RelayResponse::text(200, "ok")))
    }

    async fn status(&self, correlation_id: &CorrelationId) -> Result<RelayResponse, RelayError> {
        self.script.status_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .polled
            .lock()
            .unwrap()
            .push(correlation_id.as_str().to_string());
        let next = self.script.status_replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(RelayResponse::text(202, "")))
    }
}
