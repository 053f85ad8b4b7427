//! A generic HTTP channel adapter: POSTs the event and resolved contact
//! detail to a configured provider endpoint and maps the HTTP response onto
//! a `DeliveryResult`.
//!
//! This is the one concrete adapter shipped by the gateway itself — real
//! provider integrations (SendGrid, Twilio, ...) are expected to implement
//! [`ChannelAdapter`] directly, but most REST-style providers fit this
//! shape, behind a deliberately thin adapter boundary (spec.md §1
//! "Provider adapters").

use async_trait::async_trait;
use ngw_model::{Channel, CustomerProfile, DeliveryResult, NotificationEvent};
use serde::Serialize;

use crate::{adapter::ChannelAdapter, config::ProviderConfig};

/// Request body sent to the provider endpoint. `to` is the email address or
/// E.164 phone number the dispatcher determined was present on the
/// profile.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    notification_id: &'a str,
    metadata: &'a serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
struct SendResponse {
    #[serde(default)]
    message_id: Option<String>,
}

/// A provider reached over HTTP, identified by `config.name` and
/// `config.endpoint`.
#[derive(Debug)]
pub struct HttpChannelAdapter {
    config: ProviderConfig,
    channel: Channel,
    client: reqwest::Client,
}

impl HttpChannelAdapter {
    /// # Errors
    ///
    /// Returns an error if `reqwest::Client` construction fails (invalid
    /// TLS configuration, for instance) — not if the endpoint is
    /// unreachable, which is a runtime `send` failure, not a construction
    /// failure.
    pub fn new(config: ProviderConfig, channel: Channel) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, channel, client })
    }

    fn contact(&self, profile: &CustomerProfile) -> Option<&str> {
        match self.channel {
            Channel::Email if profile.has_email() => Some(profile.email.as_str()),
            Channel::Sms if profile.has_phone() => Some(profile.phone.as_str()),
            _ => None,
        }
    }
}

#[async_trait]
impl ChannelAdapter for HttpChannelAdapter {
    fn provider_name(&self) -> &str {
        &self.config.name
    }

    fn channel_type(&self) -> Channel {
        self.channel
    }

    fn is_configured(&self) -> bool {
        self.config.enabled && self.config.endpoint.is_some()
    }

    async fn send(&self, event: &NotificationEvent, profile: &CustomerProfile) -> DeliveryResult {
        let Some(to) = self.contact(profile) else {
            return DeliveryResult::skipped(
                self.provider_name(),
                self.channel,
                format!("profile has no {} contact on file", self.channel.as_str()),
            );
        };

        let Some(endpoint) = &self.config.endpoint else {
            return DeliveryResult::skipped(self.provider_name(), self.channel, "no endpoint configured");
        };

        let request = SendRequest {
            to,
            subject: &event.subject,
            body: &event.body,
            notification_id: &event.notification_id,
            metadata: &event.metadata,
        };

        let response = match self.client.post(endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(error) => {
                return DeliveryResult::failure(self.provider_name(), self.channel, error.to_string(), 0);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return DeliveryResult::failure(
                self.provider_name(),
                self.channel,
                format!("provider returned HTTP {status}"),
                status.as_u16().into(),
            );
        }

        match response.json::<SendResponse>().await {
            Ok(body) => DeliveryResult::success(
                self.provider_name(),
                self.channel,
                body.message_id.unwrap_or_default(),
            ),
            Err(error) => DeliveryResult::failure(
                self.provider_name(),
                self.channel,
                format!("failed to decode provider response: {error}"),
                status.as_u16().into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            name: "sendgrid".to_string(),
            enabled: true,
            endpoint: endpoint.map(str::to_string),
            timeout_ms: 1_000,
            credentials: std::collections::HashMap::new(),
        }
    }

    fn profile(email: &str, phone: &str) -> CustomerProfile {
        CustomerProfile {
            customer_id: 1,
            account_id: 1,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn unconfigured_without_endpoint() {
        let adapter = HttpChannelAdapter::new(config(None), Channel::Email).unwrap();
        assert!(!adapter.is_configured());
    }

    #[test]
    fn configured_with_endpoint() {
        let adapter = HttpChannelAdapter::new(config(Some("https://example.com/send")), Channel::Email).unwrap();
        assert!(adapter.is_configured());
    }

    #[tokio::test]
    async fn send_skips_when_profile_lacks_contact() {
        let adapter = HttpChannelAdapter::new(config(Some("https://example.com/send")), Channel::Sms).unwrap();
        let event = crate::testing::sample_event();
        let result = adapter.send(&event, &profile("a@b.com", "")).await;
        assert!(result.is_skipped());
    }
}
