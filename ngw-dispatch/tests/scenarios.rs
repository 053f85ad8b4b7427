//! End-to-end dispatch scenarios (spec.md §8 S1-S6) plus the cross-cutting
//! invariants that aren't already covered by `ngw-retry`'s own unit tests.

use std::sync::Arc;

use ngw_dispatch::{Dispatcher, RoutingConfig};
use ngw_model::{Channel, ChannelHint, DeliveryResult, NotificationType, Severity};
use ngw_providers::{ChannelAdapter, MockAdapter};
use ngw_retry::{RetryConfig, RetryExecutor};

fn no_shutdown() -> tokio::sync::watch::Receiver<bool> {
    tokio::sync::watch::channel(false).1
}

fn fast_retry(max_attempts: u32) -> RetryExecutor {
    RetryExecutor::new(RetryConfig {
        max_attempts,
        initial_delay_ms: 1,
        backoff_factor: 1.0,
        max_delay_ms: 2,
        ..RetryConfig::default()
    })
}

fn event(severity: Option<Severity>, channel: Option<ChannelHint>) -> ngw_model::NotificationEvent {
    ngw_model::NotificationEvent {
        notification_id: "n-1".to_string(),
        notification_type: NotificationType::FraudAlert,
        severity,
        channel,
        account_id: 42,
        customer_id: Some(42),
        account_number: None,
        subject: "Suspicious activity".to_string(),
        body: "We noticed something unusual.".to_string(),
        event_time: None,
        generated_at: None,
        metadata: serde_json::Value::Null,
    }
}

fn profile() -> ngw_model::CustomerProfile {
    ngw_model::CustomerProfile {
        customer_id: 42,
        account_id: 42,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+15555550123".to_string(),
    }
}

/// S1 — EMAIL only on LOW.
#[tokio::test]
async fn s1_email_only_on_low_severity() {
    let email = Arc::new(MockAdapter::new(
        "sendgrid",
        Channel::Email,
        vec![DeliveryResult::success("sendgrid", Channel::Email, "msg-1")],
    ));

    let dispatcher = Dispatcher::new(
        vec![email.clone() as Arc<dyn ChannelAdapter>],
        RoutingConfig::default(),
        fast_retry(3),
    );

    let results = dispatcher
        .dispatch(&event(Some(Severity::Low), Some(ChannelHint::Email)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_success());
    assert_eq!(email.calls(), 1);
}

/// S2 — Force BOTH on HIGH.
#[tokio::test]
async fn s2_force_both_on_high_severity() {
    let email = Arc::new(MockAdapter::new(
        "sendgrid",
        Channel::Email,
        vec![DeliveryResult::success("sendgrid", Channel::Email, "msg-1")],
    ));
    let sms = Arc::new(MockAdapter::new(
        "twilio",
        Channel::Sms,
        vec![DeliveryResult::success("twilio", Channel::Sms, "msg-2")],
    ));

    let dispatcher = Dispatcher::new(
        vec![email as Arc<dyn ChannelAdapter>, sms as Arc<dyn ChannelAdapter>],
        RoutingConfig::default(),
        fast_retry(3),
    );

    let results = dispatcher
        .dispatch(&event(Some(Severity::High), Some(ChannelHint::Email)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_success());
    assert_eq!(results[0].channel, Channel::Email);
    assert!(results[1].is_success());
    assert_eq!(results[1].channel, Channel::Sms);
}

/// S3 — Email fallback: primary exhausts `maxAttempts`, backup succeeds.
#[tokio::test]
async fn s3_email_fallback_to_backup() {
    let primary = Arc::new(MockAdapter::new(
        "primary",
        Channel::Email,
        vec![DeliveryResult::failure("primary", Channel::Email, "timeout", 0)],
    ));
    let backup = Arc::new(MockAdapter::new(
        "backup",
        Channel::Email,
        vec![DeliveryResult::success("backup", Channel::Email, "msg-3")],
    ));

    let dispatcher = Dispatcher::new(
        vec![primary.clone() as Arc<dyn ChannelAdapter>, backup.clone() as Arc<dyn ChannelAdapter>],
        RoutingConfig::default(),
        fast_retry(3),
    );

    let results = dispatcher
        .dispatch(&event(None, Some(ChannelHint::Email)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_success());
    assert_eq!(results[0].provider, "backup");
    assert_eq!(primary.calls(), 3);
    assert_eq!(backup.calls(), 1);
}

/// S4 — SKIPPED is terminal within a channel; the second adapter must not
/// be invoked.
#[tokio::test]
async fn s4_skipped_is_terminal_within_channel() {
    let first = Arc::new(MockAdapter::new(
        "twilio",
        Channel::Sms,
        vec![DeliveryResult::skipped("twilio", Channel::Sms, "no phone on file")],
    ));
    let second = Arc::new(MockAdapter::new(
        "plivo",
        Channel::Sms,
        vec![DeliveryResult::success("plivo", Channel::Sms, "msg-4")],
    ));

    let dispatcher = Dispatcher::new(
        vec![first.clone() as Arc<dyn ChannelAdapter>, second.clone() as Arc<dyn ChannelAdapter>],
        RoutingConfig::default(),
        fast_retry(3),
    );

    let results = dispatcher
        .dispatch(&event(None, Some(ChannelHint::Sms)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_skipped());
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

/// S5 — exhaustion on both channels yields two FAILURE entries (DLQ
/// publishing itself is `ngw-bus`'s concern, exercised there).
#[tokio::test]
async fn s5_exhaustion_on_both_channels() {
    let email = Arc::new(MockAdapter::new(
        "sendgrid",
        Channel::Email,
        vec![DeliveryResult::failure("sendgrid", Channel::Email, "down", 503)],
    ));
    let sms = Arc::new(MockAdapter::new(
        "twilio",
        Channel::Sms,
        vec![DeliveryResult::failure("twilio", Channel::Sms, "down", 503)],
    ));

    let dispatcher = Dispatcher::new(
        vec![email as Arc<dyn ChannelAdapter>, sms as Arc<dyn ChannelAdapter>],
        RoutingConfig::default(),
        fast_retry(2),
    );

    let results = dispatcher
        .dispatch(&event(Some(Severity::Critical), Some(ChannelHint::Both)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(DeliveryResult::is_failure));
}

/// S6 (`panics_then_success_never_propagates_and_returns_success`) lives in
/// `ngw-retry`'s own test suite: panic absorption is the retry executor's
/// responsibility, not the dispatcher's.
/// Zero adapters for a required channel yields a single SKIPPED result.
#[tokio::test]
async fn zero_adapters_for_required_channel_yields_skipped() {
    let dispatcher = Dispatcher::new(vec![], RoutingConfig::default(), fast_retry(3));

    let results = dispatcher
        .dispatch(&event(None, Some(ChannelHint::Sms)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_skipped());
    assert_eq!(results[0].provider, "none");
}

/// Unconfigured adapters are excluded at construction time, not at
/// dispatch time, so they behave exactly like zero configured adapters.
#[tokio::test]
async fn unconfigured_adapter_is_excluded_from_fallback_walk() {
    let disabled = Arc::new(MockAdapter::unconfigured("sendgrid", Channel::Email));

    let dispatcher = Dispatcher::new(vec![disabled as Arc<dyn ChannelAdapter>], RoutingConfig::default(), fast_retry(3));

    let results = dispatcher
        .dispatch(&event(None, Some(ChannelHint::Email)), &profile(), &no_shutdown())
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_skipped());
}

/// Neither channel required: empty result list, no adapters invoked.
#[tokio::test]
async fn neither_channel_required_yields_empty_result_list() {
    let email = Arc::new(MockAdapter::new(
        "sendgrid",
        Channel::Email,
        vec![DeliveryResult::success("sendgrid", Channel::Email, "msg-1")],
    ));

    let dispatcher = Dispatcher::new(vec![email.clone() as Arc<dyn ChannelAdapter>], RoutingConfig::default(), fast_retry(3));

    let results = dispatcher.dispatch(&event(None, None), &profile(), &no_shutdown()).await;

    assert!(results.is_empty());
    assert_eq!(email.calls(), 0);
}
