//! Session event bus.
//!
//! Carries the two observable outputs of a conversation: the stream of log
//! appends and the busy flag. Appends fan out over a `broadcast` channel;
//! the busy flag lives in a `watch` channel so late observers can read the
//! current value, and a `BusyChanged` event is broadcast only when the flag
//! actually flips.

use tokio::sync::{broadcast, watch};

use hookchat_types::chat::ChatMessage;
use hookchat_types::event::SessionEvent;

pub struct SessionEventBus {
    events: broadcast::Sender<SessionEvent>,
    busy: watch::Sender<bool>,
}

impl SessionEventBus {
    /// Bus holding up to `capacity` undelivered events per subscriber,
    /// starting idle.
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        let (busy, _) = watch::channel(false);
        Self { events, busy }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Receiver tracking the busy flag.
    pub fn busy_receiver(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Announce that `message` was stored at `index` of the log.
    pub fn message_appended(&self, index: usize, message: ChatMessage) {
        // No subscribers is fine.
        let _ = self
            .events
            .send(SessionEvent::MessageAppended { index, message });
    }

    /// Set the busy flag. Returns whether it changed.
    pub fn set_busy(&self, busy: bool) -> bool {
        if self.busy.send_replace(busy) == busy {
            return false;
        }
        let _ = self.events.send(SessionEvent::BusyChanged { busy });
        true
    }
}

impl std::fmt::Debug for SessionEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEventBus")
            .field("subscribers", &self.events.receiver_count())
            .field("busy", &self.is_busy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn busy_transitions_are_published_once() {
        let bus = SessionEventBus::new(16);
        let mut rx = bus.subscribe();

        assert!(!bus.set_busy(false));
        assert!(bus.set_busy(true));
        assert!(!bus.set_busy(true));
        assert!(bus.set_busy(false));

        assert_eq!(
            drain(&mut rx),
            vec![
                SessionEvent::BusyChanged { busy: true },
                SessionEvent::BusyChanged { busy: false },
            ]
        );
    }

    #[test]
    fn appended_event_carries_index_and_message() {
        let bus = SessionEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.message_appended(3, ChatMessage::assistant("hi there"));

        assert_eq!(
            drain(&mut rx),
            vec![SessionEvent::MessageAppended {
                index: 3,
                message: ChatMessage::assistant("hi there"),
            }]
        );
    }

    #[tokio::test]
    async fn busy_receiver_sees_current_value() {
        let bus = SessionEventBus::new(4);
        bus.set_busy(true);

        let mut rx = bus.busy_receiver();
        assert!(*rx.borrow());

        bus.set_busy(false);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
        assert!(!bus.is_busy());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = SessionEventBus::new(4);
        bus.message_appended(0, ChatMessage::user("hello"));
        assert!(bus.set_busy(true));
    }
}
