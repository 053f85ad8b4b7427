//! Retry-executor metrics: how many attempts a single adapter call needed
//! before reaching a terminal outcome (SPEC_FULL.md §6 "retry-count
//! histograms").
//!
//! A dedicated instrument rather than folded into the dispatch histogram,
//! since retry count and call duration answer different operational
//! questions (backoff tuning vs. provider latency).

use ngw_model::Channel;
use opentelemetry::{
    KeyValue,
    metrics::{Histogram, Meter},
};

use crate::MetricsError;

#[derive(Debug)]
pub struct RetryMetrics {
    attempts: Histogram<u64>,
}

impl RetryMetrics {
    /// # Errors
    ///
    /// Returns an error if metric instruments cannot be created.
    pub fn new() -> Result<Self, MetricsError> {
        let meter = meter();

        let attempts = meter
            .u64_histogram("ngw.retry.attempts")
            .with_description("Number of attempts the retry executor made before a terminal outcome")
            .build();

        Ok(Self { attempts })
    }

    /// Record how many attempts `retry.execute` made for one adapter call,
    /// regardless of whether it ended in SUCCESS, SKIPPED, or exhausted
    /// FAILURE (spec.md §8 invariant 4, "Retry-attempt-bound").
    pub fn record_attempts(&self, channel: Channel, provider: &str, attempts: u32) {
        let attributes = [KeyValue::new("channel", channel.as_str()), KeyValue::new("provider", provider.to_string())];
        self.attempts.record(u64::from(attempts), &attributes);
    }
}

fn meter() -> Meter {
    opentelemetry::global::meter("ngw.retry")
}
