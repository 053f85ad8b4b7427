//! Process wiring: loads configuration, builds adapters/resolver/dispatcher,
//! and owns the three concurrent workers (spec.md §5 "Scheduling model")
//! plus the shutdown sequence (spec.md §4.5).

use std::sync::Arc;
use std::time::Duration;

use ngw_bus::{ConsumeCommitLoop, ConsumerStats, DlqPublisher};
use ngw_dispatch::Dispatcher;
use ngw_health::HealthServer;
use ngw_providers::{ChannelAdapter, HttpChannelAdapter, HttpResolver, MockResolver, ProfileResolver, ResolverConfig};
use ngw_retry::RetryExecutor;
use ngw_retry::config::OnExhausted;
use tokio::sync::watch;

use crate::config::{ChannelsConfig, Config};

/// The set of adapters and resolver the dispatch engine is built against,
/// built once from configuration and reused for both `run` and `config
/// check` (the latter discards this without ever binding a port or
/// touching the Kafka client).
struct Built {
    adapters: Vec<Arc<dyn ChannelAdapter>>,
    resolver: Arc<dyn ProfileResolver>,
}

/// Owns the whole process: the consume-commit loop, the health server, and
/// the shutdown sequence that closes them in spec.md §4.5's order.
pub struct Gateway {
    config: Config,
}

impl Gateway {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse-and-validate only: builds every component the real startup
    /// path would, but never binds a port, constructs a Kafka client, or
    /// spawns a worker (spec.md §6 "CLI surface": `config check`).
    ///
    /// # Errors
    ///
    /// Returns an error for the same reasons `run` would fail fast:
    /// `retry.onExhausted = kafka` without a `dlqTopic`, zero channel
    /// adapters configured, or a malformed resolver/adapter configuration.
    pub fn validate(config: &Config) -> anyhow::Result<()> {
        config.retry.validate().map_err(|message| anyhow::anyhow!(message))?;
        let built = build(config)?;
        tracing::info!(
            adapters = built.adapters.len(),
            "configuration is valid: {} channel adapter(s) configured",
            built.adapters.iter().filter(|a| a.is_configured()).count()
        );
        Ok(())
    }

    /// Run the gateway until an external stop signal is received or the
    /// consumer loop exits on its own (spec.md §4.3 "Exit", §7 "Fatal bus
    /// error").
    ///
    /// # Errors
    ///
    /// Returns an error if any component fails to construct, or if the
    /// consumer loop ends with a fatal bus error.
    pub async fn run(self) -> anyhow::Result<()> {
        ngw_common::logging::init();
        self.config.retry.validate().map_err(|message| anyhow::anyhow!(message))?;

        if let Err(error) = ngw_metrics::init_metrics(&self.config.metrics) {
            tracing::warn!(%error, "metrics initialization failed, continuing without metrics");
        }

        let built = build(&self.config)?;
        let configured_count = built.adapters.iter().filter(|a| a.is_configured()).count();
        if configured_count == 0 {
            anyhow::bail!("no channel adapters are configured; refusing to start (spec.md §6 fail-fast)");
        }

        let gate = ngw_health::new_gate();

        let retry = RetryExecutor::new(self.config.retry.clone());
        let dispatcher = Arc::new(Dispatcher::new(built.adapters.clone(), self.config.routing.clone(), retry));

        let dlq = match self.config.retry.on_exhausted {
            OnExhausted::Kafka => {
                let topic = self
                    .config
                    .retry
                    .dlq_topic
                    .clone()
                    .expect("RetryConfig::validate already rejected kafka without a dlqTopic");
                Some(DlqPublisher::new(&self.config.bus.to_client_config(), topic)?)
            }
            OnExhausted::Log => None,
        };

        let stats = ConsumerStats::new();
        let consumer = ConsumeCommitLoop::new(
            self.config.bus.clone(),
            dispatcher,
            built.resolver,
            self.config.retry.clone(),
            dlq,
            stats,
        )?;

        // A channel private to the health server, so it closes last
        // (spec.md §4.5 close ordering) rather than the instant the
        // lifecycle gate begins shutdown — it must stay up to report
        // DOWN/NOT_READY while the loop and adapters drain.
        let (health_shutdown_tx, health_shutdown_rx) = watch::channel(false);

        let health_task = if self.config.health.enabled {
            let server = HealthServer::new(&self.config.health, gate.clone()).await?;
            Some(tokio::spawn(server.serve(health_shutdown_rx)))
        } else {
            None
        };

        let mut loop_task = tokio::spawn(consumer.serve(gate.clone()));

        tracing::info!("gateway running");

        tokio::select! {
            () = wait_for_stop_signal() => {
                tracing::info!("stop signal received, beginning shutdown");
            }
            result = &mut loop_task => {
                report_loop_exit(result);
                gate.begin_shutdown();
                close_adapters(&built.adapters).await;
                finish_health(health_task, &health_shutdown_tx).await;
                return Ok(());
            }
        }

        // Close ordering (spec.md §4.5 point 5 and this crate's §6
        // addendum): lifecycle gate -> loop thread -> bus client -> adapters
        // -> health endpoint. The bus client is owned and dropped entirely
        // inside `consumer.serve`, so waiting on `loop_task` covers it.
        gate.begin_shutdown();

        let grace = Duration::from_millis(self.config.shutdown_grace_ms);
        tokio::select! {
            result = tokio::time::timeout(grace, &mut loop_task) => {
                match result {
                    Ok(result) => report_loop_exit(result),
                    Err(_) => {
                        tracing::error!(grace_ms = self.config.shutdown_grace_ms, "grace period elapsed, aborting consumer loop");
                        loop_task.abort();
                    }
                }
            }
            () = wait_for_stop_signal() => {
                tracing::warn!("second stop signal received, aborting consumer loop immediately");
                loop_task.abort();
            }
        }

        close_adapters(&built.adapters).await;
        finish_health(health_task, &health_shutdown_tx).await;

        tracing::info!("gateway shut down cleanly");
        Ok(())
    }
}

fn build(config: &Config) -> anyhow::Result<Built> {
    let mut adapters: Vec<Arc<dyn ChannelAdapter>> = Vec::new();
    adapters.extend(channel_adapters(&config.channels, ngw_model::Channel::Email)?);
    adapters.extend(channel_adapters(&config.channels, ngw_model::Channel::Sms)?);

    let resolver = build_resolver(&config.resolver)?;

    Ok(Built { adapters, resolver })
}

fn channel_adapters(
    channels: &ChannelsConfig,
    channel: ngw_model::Channel,
) -> anyhow::Result<Vec<Arc<dyn ChannelAdapter>>> {
    let providers = match channel {
        ngw_model::Channel::Email => &channels.email,
        ngw_model::Channel::Sms => &channels.sms,
    };

    providers
        .providers
        .iter()
        .map(|provider| {
            HttpChannelAdapter::new(provider.clone(), channel)
                .map(|adapter| Arc::new(adapter) as Arc<dyn ChannelAdapter>)
                .map_err(anyhow::Error::from)
        })
        .collect()
}

fn build_resolver(config: &ResolverConfig) -> anyhow::Result<Arc<dyn ProfileResolver>> {
    match config {
        ResolverConfig::Mock => Ok(Arc::new(MockResolver::default())),
        ResolverConfig::Http { base_url, timeout_ms } => Ok(Arc::new(HttpResolver::new(base_url.clone(), *timeout_ms)?)),
    }
}

async fn close_adapters(adapters: &[Arc<dyn ChannelAdapter>]) {
    for adapter in adapters {
        tracing::debug!(provider = adapter.provider_name(), "closing adapter");
        adapter.close().await;
    }
}

async fn finish_health(
    health_task: Option<tokio::task::JoinHandle<Result<(), ngw_health::HealthError>>>,
    health_shutdown_tx: &watch::Sender<bool>,
) {
    let _ = health_shutdown_tx.send(true);
    if let Some(task) = health_task {
        if let Err(error) = task.await {
            tracing::error!(%error, "health server task panicked");
        }
    }
}

fn report_loop_exit(result: Result<Result<(), ngw_bus::BusError>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::info!("consumer loop exited cleanly"),
        Ok(Err(error)) => tracing::error!(%error, "consumer loop exited with a fatal bus error"),
        Err(error) => tracing::error!(%error, "consumer loop task panicked"),
    }
}

/// Resolves on the first `SIGTERM` or `Ctrl+C`. A second `Ctrl+C` (or a
/// second `SIGTERM`) while the bounded grace-period wait in `run` is
/// already underway forces the consumer loop to abort immediately rather
/// than waiting out the rest of the grace period.
async fn wait_for_stop_signal() {
    let mut terminate = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(signal) => signal,
        Err(error) => {
            tracing::error!(%error, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
            unreachable!()
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down");
        }
        _ = terminate.recv() => {
            tracing::info!("SIGTERM received, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_kafka_exhaustion_without_dlq_topic() {
        let mut config = Config::default();
        config.retry.on_exhausted = OnExhausted::Kafka;
        config.retry.dlq_topic = None;

        assert!(Gateway::validate(&config).is_err());
    }

    #[test]
    fn validate_accepts_default_mock_configuration_with_no_adapters() {
        // No adapters configured, but `validate` itself doesn't enforce the
        // fail-fast adapter count -- that's `run`'s concern so that `config
        // check` can still report *which* channels are unconfigured rather
        // than refusing to even parse.
        let config = Config::default();
        assert!(Gateway::validate(&config).is_ok());
    }
}
