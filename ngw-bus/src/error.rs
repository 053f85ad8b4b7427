//! Errors the bus loop can surface. Most are absorbed per-record (spec.md
//! §7); only [`BusError::Kafka`] at the `recv()` boundary is fatal and
//! ends the loop (spec.md §4.3 "Exit", §7 "Fatal bus error").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("kafka client error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("configuration error: {0}")]
    Configuration(String),
}
