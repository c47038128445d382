//! Conversation state: the append-only message log and the session that
//! owns it together with the busy flag and the pending reply task.

pub mod log;
pub mod session;
