//! RelayTransport trait definition.
//!
//! Uses native async fn in traits (RPITIT). Implementations live in
//! hookchat-infra (e.g., `HttpRelayTransport`).

use hookchat_types::error::RelayError;
use hookchat_types::relay::{CorrelationId, RelayResponse, SubmitRequest};

/// Access to the two relay endpoints.
///
/// Implementations report every HTTP status as a [`RelayResponse`]; only
/// failures that prevent a response from being read at all (network
/// errors, undecodable JSON) are returned as `Err`. Interpreting the
/// status is up to the caller.
pub trait RelayTransport: Send + Sync {
    /// `POST` the request to the submit endpoint.
    fn submit(
        &self,
        request: &SubmitRequest,
    ) -> impl std::future::Future<Output = Result<RelayResponse, RelayError>> + Send;

    /// `GET` the status endpoint for one correlation id.
    fn status(
        &self,
        correlation_id: &CorrelationId,
    ) -> impl std::future::Future<Output = Result<RelayResponse, RelayError>> + Send;
}
