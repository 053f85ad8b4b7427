//! The four consumer counters from spec.md §4.3 ("Exit"): single-writer
//! from the consumer task, read through relaxed atomic loads by the health
//! endpoint / metrics exporter (spec.md §5 "Shared resources").

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ConsumerStats {
    received: AtomicU64,
    delivered: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub received: u64,
    pub delivered: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl ConsumerStats {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
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

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConsumerStats;

    #[test]
    fn counters_start_at_zero() {
        let stats = ConsumerStats::new();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.received, 0);
        assert_eq!(snapshot.delivered, 0);
        assert_eq!(snapshot.skipped, 0);
        assert_eq!(snapshot.failed, 0);
    }

    #[test]
    fn each_counter_increments_independently() {
        let stats = ConsumerStats::new();
        stats.record_received();
        stats.record_received();
        stats.record_delivered();
        stats.record_skipped();
        stats.record_failed();
        stats.record_failed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.received, 2);
        assert_eq!(snapshot.delivered, 1);
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.failed, 2);
    }
}
