//! Relay transport implementations.
//!
//! Contains the HTTP implementation of the [`RelayTransport`] port defined
//! in `hookchat-core`.
//!
//! [`RelayTransport`]: hookchat_core::relay::transport::RelayTransport

pub mod http;

pub use http::{HttpRelayTransport, RelayEndpoints};
