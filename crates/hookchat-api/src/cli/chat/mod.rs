//! Interactive terminal chat.
//!
//! This module is the presentation layer: it reads lines, hands them to the
//! conversation session, shows a spinner while the session is busy, and
//! renders appended assistant messages. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
