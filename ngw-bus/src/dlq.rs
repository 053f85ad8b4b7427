//! Dead-letter publishing (spec.md §4.3.1, §9 "DLQ publisher wiring").
//!
//! Wired whenever `retry.onExhausted = "kafka"`; `RetryConfig::validate`
//! (in `ngw-retry`) already rejects that mode without a `dlqTopic` at
//! config-load time, so by the time a [`DlqPublisher`] exists here, the
//! topic is known to be set.

use std::time::Duration;

use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::error::BusError;

#[derive(Debug)]
pub struct DlqPublisher {
    producer: FutureProducer,
    topic: String,
}

impl DlqPublisher {
    /// # Errors
    ///
    /// Returns an error if the underlying Kafka producer client cannot be
    /// constructed.
    pub fn new(client_config: &rdkafka::ClientConfig, topic: impl Into<String>) -> Result<Self, BusError> {
        let producer: FutureProducer = client_config.create()?;
        Ok(Self { producer, topic: topic.into() })
    }

    /// Republish the original record's raw bytes unchanged (DESIGN.md Open
    /// Question 1: byte-for-byte, not a re-serialized event).
    ///
    /// # Errors
    ///
    /// Returns an error if the producer could not hand the record to the
    /// broker. Per spec.md §4.3.1, a failed DLQ publish is logged by the
    /// caller and the original record is NOT re-processed.
    pub async fn publish(&self, key: Option<&[u8]>, payload: &[u8]) -> Result<(), BusError> {
        let mut record = FutureRecord::to(&self.topic).payload(payload);
        if let Some(key) = key {
            record = record.key(key);
        }

        self.producer
            .send(record, Timeout::After(Duration::from_secs(5)))
            .await
            .map_err(|(error, _message)| BusError::Kafka(error))?;

        Ok(())
    }
}
