//! Conversation session.
//!
//! Owns the message log, the busy flag, and the single pending reply task
//! for one conversation. Submitting appends the user message and raises the
//! busy flag synchronously, then spawns a task that runs the submission
//! pipeline and, if needed, the correlation poller. The task's terminal
//! result is reconciled into the log under the session lock.
//!
//! `ConversationSession` is a cheap `Clone` handle. Closing the session
//! (explicitly, or when the last handle is dropped) cancels the pending
//! task; a closed session never mutates its log again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use hookchat_types::chat::ChatMessage;
use hookchat_types::config::ClientConfig;
use hookchat_types::event::SessionEvent;
use hookchat_types::relay::SubmitRequest;

use crate::chat::log::MessageLog;
use crate::event::bus::SessionEventBus;
use crate::relay::poller::{CorrelationPoller, PollPolicy};
use crate::relay::submit::{SubmissionOutcome, SubmissionPipeline};
use crate::relay::transport::RelayTransport;

const EVENT_CAPACITY: usize = 64;

/// Result of [`ConversationSession::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The message was appended and a reply is on its way.
    Accepted,
    /// Blank input; nothing changed.
    Ignored,
    /// A reply is still outstanding; nothing changed.
    Busy,
    /// The session has been closed; nothing changed.
    Closed,
}

/// The one in-flight reply task, if any.
struct PendingReply {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct SessionState {
    log: MessageLog,
    pending: Option<PendingReply>,
    closed: bool,
}

/// State shared between the session handles and the reply task.
struct Shared {
    state: Mutex<SessionState>,
    bus: SessionEventBus,
}

impl Shared {
    /// Lock the session state. A panic elsewhere while holding the lock
    /// cannot leave the log half-written, so a poisoned lock is recovered.
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, state: &mut SessionState, message: ChatMessage) {
        let index = state.log.append(message.clone());
        self.bus.message_appended(index, message);
    }

    /// Record a terminal reply. Returns false if the session was closed.
    fn reconcile(&self, reply: ChatMessage) -> bool {
        let mut state = self.state();
        if state.closed {
            return false;
        }
        self.append(&mut state, reply);
        state.pending = None;
        self.bus.set_busy(false);
        true
    }

    /// Freeze the log and cancel the pending reply. Idempotent.
    fn close(&self, session_id: Uuid) {
        let mut state = self.state();
        if state.closed {
            return;
        }
        state.closed = true;
        if let Some(pending) = state.pending.take() {
            pending.cancel.cancel();
            pending.handle.abort();
            info!(%session_id, "pending reply cancelled");
        }
        self.bus.set_busy(false);
    }
}

/// Everything a handle points at. Dropped with the last handle; the reply
/// task only holds `Shared` and the transport, so it never keeps this alive.
struct SessionInner<T> {
    id: Uuid,
    transport: Arc<T>,
    policy: PollPolicy,
    shared: Arc<Shared>,
}

impl<T> Drop for SessionInner<T> {
    fn drop(&mut self) {
        self.shared.close(self.id);
    }
}

/// Handle to one conversation with the relay.
///
/// Must be used from within a tokio runtime: accepted submissions spawn
/// their reply task on it.
pub struct ConversationSession<T: RelayTransport + 'static> {
    inner: Arc<SessionInner<T>>,
}

impl<T: RelayTransport + 'static> Clone for ConversationSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: RelayTransport + 'static> ConversationSession<T> {
    /// Create a session, optionally seeded with an assistant greeting.
    pub fn new(transport: T, policy: PollPolicy, greeting: Option<&str>) -> Self {
        let log = match greeting {
            Some(greeting) => MessageLog::with_greeting(greeting),
            None => MessageLog::new(),
        };

        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::now_v7(),
                transport: Arc::new(transport),
                policy,
                shared: Arc::new(Shared {
                    state: Mutex::new(SessionState {
                        log,
                        pending: None,
                        closed: false,
                    }),
                    bus: SessionEventBus::new(EVENT_CAPACITY),
                }),
            }),
        }
    }

    /// Create a session using the poll policy and greeting from `config`.
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::new(transport, PollPolicy::from(config), config.greeting())
    }

    fn shared(&self) -> &Shared {
        &self.inner.shared
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Ordered copy of the conversation so far.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared().state().log.snapshot()
    }

    pub fn len(&self) -> usize {
        self.shared().state().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared().state().log.is_empty()
    }

    /// Whether a reply is outstanding (drives the typing indicator).
    pub fn is_busy(&self) -> bool {
        self.shared().bus.is_busy()
    }

    pub fn is_closed(&self) -> bool {
        self.shared().state().closed
    }

    /// Receive future log appends and busy changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared().bus.subscribe()
    }

    /// Resolve once no reply is outstanding.
    pub async fn wait_idle(&self) {
        let mut rx = self.shared().bus.busy_receiver();
        let _ = rx.wait_for(|busy| !*busy).await;
    }

    /// Submit user text.
    ///
    /// Blank text is ignored and a submission while busy is refused; in both
    /// cases neither the log nor the busy flag changes. Otherwise the user
    /// message is appended verbatim and busy is raised before this returns,
    /// so it is always ordered before its reply.
    pub fn submit(&self, text: &str) -> SubmitStatus {
        if !SubmissionPipeline::accepts(text) {
            return SubmitStatus::Ignored;
        }

        let inner = &self.inner;
        let mut state = inner.shared.state();
        if state.closed {
            return SubmitStatus::Closed;
        }
        if inner.shared.bus.is_busy() {
            return SubmitStatus::Busy;
        }

        let request = SubmissionPipeline::build_request(text, state.log.messages());
        inner.shared.append(&mut state, ChatMessage::user(text));
        inner.shared.bus.set_busy(true);

        let cancel = CancellationToken::new();
        let span = info_span!("reply", session_id = %inner.id);
        let handle = tokio::spawn(
            deliver_reply(
                Arc::clone(&inner.transport),
                Arc::clone(&inner.shared),
                inner.policy,
                request,
                cancel.clone(),
            )
            .instrument(span),
        );
        state.pending = Some(PendingReply { cancel, handle });

        info!(session_id = %inner.id, history = state.log.len() - 1, "message submitted");
        SubmitStatus::Accepted
    }

    /// Tear the session down for every handle, cancelling any pending reply.
    ///
    /// Idempotent. After this returns the log is frozen and busy is false.
    pub fn close(&self) {
        self.shared().close(self.inner.id);
    }
}

/// Body of the reply task.
async fn deliver_reply<T: RelayTransport>(
    transport: Arc<T>,
    shared: Arc<Shared>,
    policy: PollPolicy,
    request: SubmitRequest,
    cancel: CancellationToken,
) {
    let reply = tokio::select! {
        _ = cancel.cancelled() => return,
        reply = resolve_reply(transport.as_ref(), policy, &request) => reply,
    };

    if !shared.reconcile(ChatMessage::assistant(reply)) {
        warn!("session closed before reply could be recorded");
    }
}

/// Run submission and, when correlated, polling; always yields reply text.
async fn resolve_reply<T: RelayTransport>(
    transport: &T,
    policy: PollPolicy,
    request: &SubmitRequest,
) -> String {
    let outcome = transport
        .submit(request)
        .await
        .and_then(SubmissionPipeline::classify);

    match outcome {
        Ok(SubmissionOutcome::Inline(text)) => {
            info!("relay answered inline");
            text
        }
        Ok(SubmissionOutcome::Correlated(correlation_id)) => {
            info!(%correlation_id, "relay accepted message, polling for reply");
            CorrelationPoller::new(transport, policy)
                .poll(&correlation_id)
                .await
                .into_reply()
        }
        Err(err) => {
            warn!(error = %err, "submission failed");
            err.user_message()
        }
    }
}
