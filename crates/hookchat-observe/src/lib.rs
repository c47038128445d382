//! Observability setup for hookchat: tracing subscriber initialisation with
//! optional OpenTelemetry export.

pub mod tracing_setup;
