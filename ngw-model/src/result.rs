//! The outcome of one provider attempt (C1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The transport category a delivery attempt went out over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
        }
    }
}

/// Status of one `DeliveryResult`. Exactly one of `SUCCESS`, `FAILURE`, or
/// `SKIPPED` applies to any given result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Success,
    Failure,
    Skipped,
}

/// Immutable outcome of one provider attempt.
///
/// Invariant: exactly one of `provider_message_id` / `error_message` is
/// meaningfully populated, matching `status` — `Success` carries a message
/// id, `Failure`/`Skipped` carry an error message. `delivered_at` is
/// stamped at construction time, not at provider-ack time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub status: DeliveryStatus,
    pub provider: String,
    pub channel: Channel,
    #[serde(default)]
    pub provider_message_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Transport status code from the provider (e.g. HTTP status), 0 when
    /// not available.
    #[serde(default)]
    pub transport_status: u32,
    pub delivered_at: DateTime<Utc>,
}

impl DeliveryResult {
    #[must_use]
    pub fn success(provider: impl Into<String>, channel: Channel, provider_message_id: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Success,
            provider: provider.into(),
            channel,
            provider_message_id: Some(provider_message_id.into()),
            error_message: None,
            transport_status: 0,
            delivered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn failure(
        provider: impl Into<String>,
        channel: Channel,
        error_message: impl Into<String>,
        transport_status: u32,
    ) -> Self {
        Self {
            status: DeliveryStatus::Failure,
            provider: provider.into(),
            channel,
            provider_message_id: None,
            error_message: Some(error_message.into()),
            transport_status,
            delivered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn skipped(provider: impl Into<String>, channel: Channel, error_message: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Skipped,
            provider: provider.into(),
            channel,
            provider_message_id: None,
            error_message: Some(error_message.into()),
            transport_status: 0,
            delivered_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, DeliveryStatus::Success)
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self.status, DeliveryStatus::Skipped)
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.status, DeliveryStatus::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_sets_provider_message_id_only() {
        let r = DeliveryResult::success("sendgrid", Channel::Email, "msg-1");
        assert!(r.is_success());
        assert_eq!(r.provider_message_id.as_deref(), Some("msg-1"));
        assert!(r.error_message.is_none());
    }

    #[test]
    fn skipped_sets_error_message_only() {
        let r = DeliveryResult::skipped("none", Channel::Sms, "no SMS adapters configured");
        assert!(r.is_skipped());
        assert!(r.provider_message_id.is_none());
        assert_eq!(r.error_message.as_deref(), Some("no SMS adapters configured"));
    }
}
