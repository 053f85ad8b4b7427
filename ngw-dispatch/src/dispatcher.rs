//! The dispatcher (C3): transforms one `(event, profile)` into a list of
//! per-channel attempt results by walking each required channel's ordered
//! adapter list through the retry executor (spec.md §4.2).

use std::sync::Arc;

use ngw_model::{Channel, CustomerProfile, DeliveryResult, NotificationEvent};
use ngw_providers::ChannelAdapter;
use ngw_retry::RetryExecutor;
use tokio::sync::watch;

use crate::routing::{RoutingConfig, required_channels};

/// Per-channel ordered adapter lists plus the routing and retry policy
/// they're walked under. Built once at startup from `isConfigured()`
/// filtered adapters (spec.md §3 "Adapter list": "stable across the
/// process lifetime").
#[derive(Debug)]
pub struct Dispatcher {
    email_adapters: Vec<Arc<dyn ChannelAdapter>>,
    sms_adapters: Vec<Arc<dyn ChannelAdapter>>,
    routing: RoutingConfig,
    retry: RetryExecutor,
}

impl Dispatcher {
    /// Builds the per-channel adapter lists, preserving configured order
    /// and keeping only adapters that pass `is_configured()`.
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn ChannelAdapter>>, routing: RoutingConfig, retry: RetryExecutor) -> Self {
        let mut email_adapters = Vec::new();
        let mut sms_adapters = Vec::new();

        for adapter in adapters {
            if !adapter.is_configured() {
                tracing::info!(provider = adapter.provider_name(), "adapter not configured, excluding from fallback walk");
                continue;
            }
            match adapter.channel_type() {
                Channel::Email => email_adapters.push(adapter),
                Channel::Sms => sms_adapters.push(adapter),
            }
        }

        Self { email_adapters, sms_adapters, routing, retry }
    }

    fn adapters(&self, channel: Channel) -> &[Arc<dyn ChannelAdapter>] {
        match channel {
            Channel::Email => &self.email_adapters,
            Channel::Sms => &self.sms_adapters,
        }
    }

    /// Dispatch one event. Never empty unless neither channel is required
    /// (spec.md §4.2): that case logs a warning and returns an empty list.
    ///
    /// `shutdown` is forwarded to the retry executor so an in-progress
    /// inter-attempt sleep unblocks promptly on lifecycle stop (spec.md
    /// §5 Cancellation).
    pub async fn dispatch(
        &self,
        event: &NotificationEvent,
        profile: &CustomerProfile,
        shutdown: &watch::Receiver<bool>,
    ) -> Vec<DeliveryResult> {
        let required = required_channels(&self.routing, event);

        if required.is_empty() {
            tracing::warn!(
                notification_id = %event.notification_id,
                account_id = event.account_id,
                "event requires neither EMAIL nor SMS, nothing to dispatch"
            );
            return Vec::new();
        }

        let mut results = Vec::with_capacity(2);

        // EMAIL strictly before SMS when both required (spec.md §4.2 "Ordering
        // guarantees"); no concurrency between channels (spec.md §5).
        if required.email {
            results.push(self.fallback_walk(Channel::Email, event, profile, shutdown).await);
        }
        if required.sms {
            results.push(self.fallback_walk(Channel::Sms, event, profile, shutdown).await);
        }

        results
    }

    /// Walk one channel's ordered adapter list until a terminal outcome
    /// (SUCCESS or SKIPPED), or FAILURE exhaustion (spec.md §4.2 "Fallback
    /// walk").
    async fn fallback_walk(
        &self,
        channel: Channel,
        event: &NotificationEvent,
        profile: &CustomerProfile,
        shutdown: &watch::Receiver<bool>,
    ) -> DeliveryResult {
        let adapters = self.adapters(channel);

        if adapters.is_empty() {
            return DeliveryResult::skipped(
                "none",
                channel,
                format!("No {} adapters configured", channel.as_str()),
            );
        }

        let mut last = None;

        for adapter in adapters {
            let description = format!("{}:{}", channel.as_str(), adapter.provider_name());
            let started = std::time::Instant::now();
            let result = self
                .retry
                .execute(|| adapter.send(event, profile), &description, shutdown.clone())
                .await;

            if let Some(metrics) = ngw_metrics::metrics() {
                metrics.dispatch.record_attempt(channel, adapter.provider_name(), result.status, started.elapsed().as_secs_f64());
            }

            tracing::info!(
                notification_id = %event.notification_id,
                account_id = event.account_id,
                channel = channel.as_str(),
                provider = adapter.provider_name(),
                status = ?result.status,
                "adapter attempt result"
            );

            match result.status {
                ngw_model::DeliveryStatus::Success | ngw_model::DeliveryStatus::Skipped => return result,
                ngw_model::DeliveryStatus::Failure => last = Some(result),
            }
        }

        last.expect("adapters is non-empty, so at least one FAILURE result was produced")
    }
}
