//! The inbound notification event, decoded from a bus record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Channel;

/// The closed set of notification kinds the upstream producer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    FraudAlert,
    HighValueAlert,
    BalanceUpdate,
    DormancyAlert,
    DailySpendSummary,
}

/// Event severity, used to drive the force-both routing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// The channel hint carried on an event, distinct from [`Channel`]: an event
/// may ask for both channels at once, an adapter result may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelHint {
    Email,
    Sms,
    Both,
}

impl ChannelHint {
    #[must_use]
    pub const fn wants(self, channel: Channel) -> bool {
        matches!(
            (self, channel),
            (Self::Both, _) | (Self::Email, Channel::Email) | (Self::Sms, Channel::Sms)
        )
    }
}

/// A decoded notification event. Immutable once constructed.
///
/// Unknown JSON fields on the wire are ignored (no `deny_unknown_fields`);
/// `metadata` is carried through as an opaque JSON value for adapters that
/// care about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub notification_id: String,
    pub notification_type: NotificationType,
    pub severity: Option<Severity>,
    pub channel: Option<ChannelHint>,
    pub account_id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Error returned when a raw bus record fails to decode into a
/// [`NotificationEvent`]. A missing or empty `notificationId` is treated as
/// a decode failure even when the rest of the JSON document parses cleanly.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decoded event has an empty notificationId")]
    EmptyNotificationId,
}

impl NotificationEvent {
    /// Decode one bus record value, enforcing the non-empty
    /// `notificationId` invariant from the data model.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the bytes are not valid JSON for this
    /// schema, or if `notificationId` is empty.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let event: Self = serde_json::from_slice(bytes)?;
        if event.notification_id.is_empty() {
            return Err(DecodeError::EmptyNotificationId);
        }
        Ok(event)
    }
}
