//! Dispatch metrics: per-attempt counters and duration histograms, keyed by
//! `(channel, provider, status)` (SPEC_FULL.md §6 "Metrics").
//!
//! The gateway's unit of delivery is a channel adapter attempt, so every
//! instrument here is keyed by channel and provider rather than by
//! recipient domain.

use ngw_model::{Channel, DeliveryStatus};
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
};

use crate::MetricsError;

#[derive(Debug)]
pub struct DispatchMetrics {
    attempts_total: Counter<u64>,
    duration_seconds: Histogram<f64>,
}

impl DispatchMetrics {
    /// # Errors
    ///
    /// Returns an error if metric instruments cannot be created.
    pub fn new() -> Result<Self, MetricsError> {
        let meter = meter();

        let attempts_total = meter
            .u64_counter("ngw.dispatch.attempts.total")
            .with_description("Total number of channel adapter send attempts by channel, provider, and outcome")
            .build();

        let duration_seconds = meter
            .f64_histogram("ngw.dispatch.duration.seconds")
            .with_description("Distribution of one adapter attempt's wall-clock duration, including retries")
            .build();

        Ok(Self { attempts_total, duration_seconds })
    }

    /// Record one terminal fallback-walk outcome (spec.md §4.2): one call
    /// per required channel per event, after the retry executor has
    /// already resolved SUCCESS/SKIPPED/exhausted-FAILURE.
    pub fn record_attempt(&self, channel: Channel, provider: &str, status: DeliveryStatus, duration_secs: f64) {
        let attributes = [
            KeyValue::new("channel", channel.as_str()),
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("status", status_label(status)),
        ];
        self.attempts_total.add(1, &attributes);
        self.duration_seconds.record(duration_secs, &attributes);
    }
}

const fn status_label(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Success => "success",
        DeliveryStatus::Failure => "failure",
        DeliveryStatus::Skipped => "skipped",
    }
}

fn meter() -> Meter {
    opentelemetry::global::meter("ngw.dispatch")
}
