//! The retry executor proper.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use ngw_model::DeliveryResult;
use tokio::sync::watch;

use crate::{config::RetryConfig, delay::next_delay};

/// Wraps one adapter call, applying the bounded-attempt, backoff-with-jitter
/// policy from `RetryConfig`. Never propagates an error or a panic: both are
/// normalized into a `FAILURE` `DeliveryResult`.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `operation` up to `config.max_attempts` times.
    ///
    /// `shutdown` is a watch channel that flips to `true` when the
    /// lifecycle gate begins shutdown; it cancels an in-progress
    /// inter-attempt sleep so the consumer worker unblocks promptly
    /// (spec §5 Cancellation, §9 "blocking sleep between retries").
    pub async fn execute<F, Fut>(
        &self,
        mut operation: F,
        description: &str,
        mut shutdown: watch::Receiver<bool>,
    ) -> DeliveryResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DeliveryResult>,
    {
        let mut last = None;
        let mut attempts_made = 0;

        for attempt in 1..=self.config.max_attempts {
            attempts_made = attempt;
            let result = AssertUnwindSafe(operation())
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let message = panic_message(&panic);
                    tracing::warn!(description, attempt, %message, "adapter call panicked, treating as FAILURE");
                    let (channel, provider) = channel_and_provider(description);
                    DeliveryResult::failure(provider, channel, format!("Exception: {message}"), 0)
                });

            match result.status {
                ngw_model::DeliveryStatus::Success | ngw_model::DeliveryStatus::Skipped => {
                    record_attempts(&result, attempts_made);
                    return result;
                }
                ngw_model::DeliveryStatus::Failure => {
                    last = Some(result);
                }
            }

            if attempt < self.config.max_attempts {
                let delay = next_delay(&self.config, attempt);
                tracing::debug!(description, attempt, delay_ms = %delay.as_millis(), "retrying after backoff");

                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    _ = shutdown.changed() => {
                        tracing::debug!(description, attempt, "retry sleep interrupted by shutdown");
                        break;
                    }
                }
            }
        }

        let result = last.expect("max_attempts >= 1 guarantees at least one FAILURE result");
        record_attempts(&result, attempts_made);
        result
    }
}

/// Feeds `ngw-metrics`' retry-attempts histogram, when metrics are enabled.
/// A no-op otherwise, so `ngw-retry` never requires `ngw_metrics::init_metrics`
/// to have been called.
fn record_attempts(result: &DeliveryResult, attempts: u32) {
    if let Some(metrics) = ngw_metrics::metrics() {
        metrics.retry.record_attempts(result.channel, &result.provider, attempts);
    }
}

/// Recovers the `(channel, provider)` a panic happened under from the
/// `"{CHANNEL}:{provider}"` description `fallback_walk` builds
/// (dispatcher.rs), so a synthesized panic `FAILURE` is attributed to the
/// adapter that actually panicked rather than a guess (spec §4.1 point 5).
fn channel_and_provider(description: &str) -> (ngw_model::Channel, &str) {
    match description.split_once(':') {
        Some(("SMS", provider)) => (ngw_model::Channel::Sms, provider),
        Some((_, provider)) => (ngw_model::Channel::Email, provider),
        None => (ngw_model::Channel::Email, description),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
