//! Conversation logic for hookchat.
//!
//! This crate defines the `RelayTransport` port that the infrastructure
//! layer implements, plus everything that runs on top of it: the message
//! log, the submission pipeline, the correlation poller, and the
//! conversation session that ties them together. It depends only on
//! `hookchat-types` -- never on `hookchat-infra` or any HTTP crate.

pub mod chat;
pub mod event;
pub mod relay;
