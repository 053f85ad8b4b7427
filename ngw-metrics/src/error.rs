//! Error types for metrics operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics system already initialized")]
    AlreadyInitialized,

    #[error("opentelemetry error: {0}")]
    OpenTelemetry(String),
}
