//! Shared domain types for hookchat.
//!
//! This crate contains the types used across the hookchat workspace:
//! chat messages, relay wire shapes, session events, configuration, and
//! error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod relay;
