//! Shared test fixtures for this crate's own adapter tests.

use ngw_model::{CustomerProfile, NotificationEvent, NotificationType, Severity};

#[must_use]
pub fn sample_event() -> NotificationEvent {
    NotificationEvent {
        notification_id: "n-1".to_string(),
        notification_type: NotificationType::BalanceUpdate,
        severity: Some(Severity::Low),
        channel: None,
        account_id: 1,
        customer_id: Some(1),
        account_number: Some("acct-1".to_string()),
        subject: "Balance update".to_string(),
        body: "Your balance changed.".to_string(),
        event_time: None,
        generated_at: None,
        metadata: serde_json::Value::Null,
    }
}

#[must_use]
pub fn sample_profile() -> CustomerProfile {
    CustomerProfile {
        customer_id: 1,
        account_id: 1,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+15555550123".to_string(),
    }
}
