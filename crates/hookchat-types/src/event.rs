//! Session events consumed by presentation layers.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// A change to a conversation session's observable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A message was appended to the log.
    MessageAppended { index: usize, message: ChatMessage },

    /// The typing indicator turned on or off.
    BusyChanged { busy: bool },
}
