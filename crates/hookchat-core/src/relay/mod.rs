//! Relay protocol: submitting a message and reconciling its reply.
//!
//! - `RelayTransport`: the port implemented by the HTTP layer
//! - `body`: content-type driven response body parsing
//! - `SubmissionPipeline`: builds the outbound request and classifies the ack
//! - `CorrelationPoller`: polls the status endpoint until a terminal outcome

pub mod body;
pub mod poller;
pub mod submit;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
