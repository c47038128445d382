//! Infrastructure layer for hookchat.
//!
//! Contains the `reqwest`-backed implementation of the `RelayTransport`
//! port defined in `hookchat-core`, and the configuration file loader.

pub mod config;
pub mod relay;
