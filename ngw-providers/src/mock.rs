//! A scriptable [`ChannelAdapter`] for exercising the dispatcher and retry
//! executor without a real provider.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use ngw_model::{Channel, CustomerProfile, DeliveryResult, NotificationEvent};

use crate::adapter::ChannelAdapter;

/// Returns a fixed, ordered sequence of canned results, one per call to
/// `send`; once the script is exhausted, further calls repeat the last
/// scripted result. Call count is observable via [`MockAdapter::calls`]
/// for asserting fallback-walk and retry invocation counts (spec.md §8
/// scenarios S3/S4/S6).
#[derive(Debug)]
pub struct MockAdapter {
    provider_name: String,
    channel: Channel,
    configured: bool,
    script: Mutex<VecDeque<DeliveryResult>>,
    last: Mutex<Option<DeliveryResult>>,
    calls: AtomicU32,
}

impl MockAdapter {
    #[must_use]
    pub fn new(provider_name: impl Into<String>, channel: Channel, script: Vec<DeliveryResult>) -> Self {
        Self {
            provider_name: provider_name.into(),
            channel,
            configured: true,
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
        }
    }

    /// An adapter that fails `is_configured()`, for exercising the "zero
    /// adapters configured" path.
    #[must_use]
    pub fn unconfigured(provider_name: impl Into<String>, channel: Channel) -> Self {
        Self {
            provider_name: provider_name.into(),
            channel,
            configured: false,
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelAdapter for MockAdapter {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn channel_type(&self) -> Channel {
        self.channel
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, _event: &NotificationEvent, _profile: &CustomerProfile) -> DeliveryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().expect("mock adapter script lock poisoned");
        let result = script.pop_front().or_else(|| self.last.lock().expect("mock adapter last lock poisoned").clone());

        let result = result.unwrap_or_else(|| {
            DeliveryResult::failure(&self.provider_name, self.channel, "mock adapter script exhausted", 0)
        });

        *self.last.lock().expect("mock adapter last lock poisoned") = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn repeats_last_scripted_result_once_exhausted() {
        let adapter = MockAdapter::new(
            "sendgrid",
            Channel::Email,
            vec![DeliveryResult::success("sendgrid", Channel::Email, "id-1")],
        );
        let event = crate::testing::sample_event();
        let profile = crate::testing::sample_profile();

        let first = adapter.send(&event, &profile).await;
        let second = adapter.send(&event, &profile).await;

        assert!(first.is_success());
        assert!(second.is_success());
        assert_eq!(adapter.calls(), 2);
    }
}
