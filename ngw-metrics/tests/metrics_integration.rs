//! Integration tests for the metrics instrument constructors.
//!
//! These exercise instrument creation and recording calls only; asserting
//! on exported values would require a running OTLP collector, which this
//! crate intentionally does not stand up in tests (`init_metrics` itself is
//! left untested for the same reason — it requires a live endpoint).

use ngw_metrics::{ConsumerMetrics, DispatchMetrics, RetryMetrics};
use ngw_model::{Channel, DeliveryStatus};

#[test]
fn dispatch_metrics_record_attempt_does_not_panic() {
    let metrics = DispatchMetrics::new().expect("instrument creation should not fail");

    metrics.record_attempt(Channel::Email, "sendgrid", DeliveryStatus::Success, 0.042);
    metrics.record_attempt(Channel::Sms, "twilio", DeliveryStatus::Failure, 1.2);
    metrics.record_attempt(Channel::Sms, "twilio", DeliveryStatus::Skipped, 0.0);
}

#[test]
fn retry_metrics_record_attempts_does_not_panic() {
    let metrics = RetryMetrics::new().expect("instrument creation should not fail");

    metrics.record_attempts(Channel::Email, "sendgrid", 1);
    metrics.record_attempts(Channel::Sms, "twilio", 3);
}

#[test]
fn consumer_metrics_counters_accumulate_independently() {
    let metrics = ConsumerMetrics::new().expect("instrument creation should not fail");

    for _ in 0..10 {
        metrics.record_received();
    }
    for _ in 0..7 {
        metrics.record_delivered();
    }
    for _ in 0..2 {
        metrics.record_skipped();
    }
    metrics.record_failed();

    metrics.record_batch(10, 0.25);
}

#[test]
fn consumer_metrics_concurrent_updates_do_not_panic() {
    use std::sync::Arc;
    use std::thread;

    let metrics = Arc::new(ConsumerMetrics::new().expect("instrument creation should not fail"));
    let mut handles = Vec::new();

    for _ in 0..10 {
        let metrics = Arc::clone(&metrics);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                metrics.record_received();
            }
        }));
    }

    for handle in handles {
        handle.join().expect("worker thread should not panic");
    }
}
