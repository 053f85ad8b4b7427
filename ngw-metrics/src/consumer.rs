//! Consumer-loop metrics: batch shape plus the four outcome counters from
//! spec.md §4.3 ("Exit"), exported as OpenTelemetry observable counters
//! reading atomics this struct owns itself.
//!
//! Kept as a second set of atomics alongside `ngw_bus::ConsumerStats`
//! rather than sharing state directly — `ConsumerStats` is the
//! correctness-critical copy logged at loop exit (spec.md §4.3), this one
//! is the ambient OTel-facing copy, so a metrics-export bug can never
//! perturb the core loop's own bookkeeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use opentelemetry::metrics::{Histogram, Meter};

use crate::MetricsError;

#[derive(Debug)]
pub struct ConsumerMetrics {
    batch_size: Histogram<u64>,
    batch_duration_seconds: Histogram<f64>,
    received: Arc<AtomicU64>,
    delivered: Arc<AtomicU64>,
    skipped: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl ConsumerMetrics {
    /// # Errors
    ///
    /// Returns an error if metric instruments cannot be created.
    #[allow(clippy::too_many_lines)]
    pub fn new() -> Result<Self, MetricsError> {
        let meter = meter();

        let batch_size = meter
            .u64_histogram("ngw.consumer.batch.size")
            .with_description("Number of records accumulated into one polled batch")
            .build();

        let batch_duration_seconds = meter
            .f64_histogram("ngw.consumer.batch.duration.seconds")
            .with_description("Wall-clock time to process and commit one polled batch")
            .build();

        let received = Arc::new(AtomicU64::new(0));
        let delivered = Arc::new(AtomicU64::new(0));
        let skipped = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        register_observable_counter(&meter, "ngw.consumer.received.total", "Total records received from the bus", &received);
        register_observable_counter(&meter, "ngw.consumer.delivered.total", "Total records with at least one SUCCESS result", &delivered);
        register_observable_counter(&meter, "ngw.consumer.skipped.total", "Total records skipped (profile not found)", &skipped);
        register_observable_counter(&meter, "ngw.consumer.failed.total", "Total records that decoded but never reached SUCCESS", &failed);

        Ok(Self { batch_size, batch_duration_seconds, received, delivered, skipped, failed })
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn record_batch(&self, size: usize, duration_secs: f64) {
        self.batch_size.record(size as u64, &[]);
        self.batch_duration_seconds.record(duration_secs, &[]);
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

fn register_observable_counter(meter: &Meter, name: &'static str, description: &'static str, counter: &Arc<AtomicU64>) {
    let counter = Arc::clone(counter);
    meter
        .u64_observable_counter(name)
        .with_description(description)
        .with_callback(move |observer| observer.observe(counter.load(Ordering::Relaxed), &[]))
        .build();
}

fn meter() -> Meter {
    opentelemetry::global::meter("ngw.consumer")
}
