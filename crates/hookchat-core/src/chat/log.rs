//! Append-only message log.

use hookchat_types::chat::ChatMessage;

/// Ordered record of a conversation.
///
/// Insertion order is chronological order is display order. The only
/// mutation is [`MessageLog::append`]; entries are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log starting with an assistant greeting.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut log = Self::new();
        log.append(ChatMessage::assistant(greeting));
        log
    }

    /// Append a message, returning its index.
    pub fn append(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Owned copy of the log for handing to observers.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
