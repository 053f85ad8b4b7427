//! C4: the consume-commit loop (spec.md §4.3, §4.4).

use std::sync::Arc;
use std::time::Duration;

use ngw_dispatch::Dispatcher;
use ngw_health::LifecycleGate;
use ngw_model::{DeliveryResult, NotificationEvent};
use ngw_providers::ProfileResolver;
use ngw_retry::RetryConfig;
use ngw_retry::config::OnExhausted;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::{Message, OwnedMessage};
use tokio::sync::watch;

use crate::config::BusConfig;
use crate::dlq::DlqPublisher;
use crate::error::BusError;
use crate::stats::ConsumerStats;

/// Owns the bus client exclusively; no other component touches it (spec.md
/// §5 "Shared resources").
pub struct ConsumeCommitLoop {
    consumer: StreamConsumer,
    config: BusConfig,
    dispatcher: Arc<Dispatcher>,
    resolver: Arc<dyn ProfileResolver>,
    retry_config: RetryConfig,
    dlq: Option<DlqPublisher>,
    stats: Arc<ConsumerStats>,
}

impl ConsumeCommitLoop {
    /// # Errors
    ///
    /// Returns an error if the underlying Kafka consumer client cannot be
    /// constructed.
    pub fn new(
        config: BusConfig,
        dispatcher: Arc<Dispatcher>,
        resolver: Arc<dyn ProfileResolver>,
        retry_config: RetryConfig,
        dlq: Option<DlqPublisher>,
        stats: Arc<ConsumerStats>,
    ) -> Result<Self, BusError> {
        let consumer: StreamConsumer = config.to_client_config().create()?;
        Ok(Self { consumer, config, dispatcher, resolver, retry_config, dlq, stats })
    }

    /// Run until `gate` begins shutdown (spec.md §4.3 "Exit", §4.5).
    ///
    /// # Errors
    ///
    /// Returns an error on subscribe failure, or on a fatal Kafka client
    /// error observed while polling (spec.md §7 "Fatal bus error") — the
    /// only two ways this loop ends other than a graceful stop.
    pub async fn serve(self, gate: Arc<LifecycleGate>) -> Result<(), BusError> {
        let topics: Vec<&str> = self.config.topics.iter().map(String::as_str).collect();
        self.consumer.subscribe(&topics)?;

        tracing::info!(topics = ?self.config.topics, group_id = %self.config.group_id, "consumer subscribed");
        gate.mark_ready();

        let mut shutdown = gate.shutdown_signal();

        while gate.is_running() {
            let batch = match self.poll_batch(&mut shutdown).await {
                Ok(batch) => batch,
                Err(error) => {
                    tracing::error!(%error, "fatal bus error, consumer loop exiting");
                    return Err(error);
                }
            };

            if batch.is_empty() {
                continue;
            }

            let batch_started = std::time::Instant::now();

            for message in &batch {
                self.process_record(message, &shutdown).await;
                self.consumer.store_offset_from_message(message)?;
            }

            // Synchronous, once per fully-processed batch, never before
            // (spec.md §4.3 step 3, §9 "At-least-once offset semantics").
            self.consumer.commit_consumer_state(CommitMode::Sync)?;

            if let Some(metrics) = ngw_metrics::metrics() {
                metrics.consumer.record_batch(batch.len(), batch_started.elapsed().as_secs_f64());
            }
        }

        let snapshot = self.stats.snapshot();
        tracing::info!(
            received = snapshot.received,
            delivered = snapshot.delivered,
            skipped = snapshot.skipped,
            failed = snapshot.failed,
            "consumer loop exiting"
        );

        Ok(())
    }

    /// Accumulate messages into one batch until `poll_timeout_ms` elapses,
    /// `max_poll_records` is reached, or shutdown is signalled — the
    /// Rust-idiomatic rendering of a batched poll over a client whose
    /// native API yields one message per call (SPEC_FULL.md §4.3).
    async fn poll_batch(&self, shutdown: &mut watch::Receiver<bool>) -> Result<Vec<OwnedMessage>, BusError> {
        let mut batch = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(self.config.poll_timeout_ms);

        loop {
            if batch.len() >= self.config.max_poll_records {
                break;
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                break;
            }

            tokio::select! {
                received = self.consumer.recv() => {
                    match received {
                        Ok(message) => batch.push(message.detach()),
                        Err(error) => return Err(BusError::from(error)),
                    }
                }
                () = tokio::time::sleep(remaining) => break,
                _ = shutdown.changed() => break,
            }
        }

        Ok(batch)
    }

    /// Decode, resolve, dispatch, log — with full per-record isolation
    /// (spec.md §4.4): nothing in here propagates an error out of this
    /// function.
    async fn process_record(&self, message: &OwnedMessage, shutdown: &watch::Receiver<bool>) {
        self.stats.record_received();
        if let Some(metrics) = ngw_metrics::metrics() {
            metrics.consumer.record_received();
        }

        let Some(payload) = message.payload() else {
            tracing::error!(
                topic = message.topic(),
                partition = message.partition(),
                offset = message.offset(),
                "record has no payload, treating as decode failure"
            );
            self.record_failed();
            return;
        };

        let event = match NotificationEvent::decode(payload) {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(
                    topic = message.topic(),
                    partition = message.partition(),
                    offset = message.offset(),
                    %error,
                    "failed to decode notification event"
                );
                self.record_failed();
                return;
            }
        };

        let Some(profile) = self.resolver.resolve(event.account_id).await else {
            tracing::warn!(
                notification_id = %event.notification_id,
                account_id = event.account_id,
                "customer profile not found, skipping"
            );
            self.stats.record_skipped();
            if let Some(metrics) = ngw_metrics::metrics() {
                metrics.consumer.record_skipped();
            }
            return;
        };

        let results = self.dispatcher.dispatch(&event, &profile, shutdown).await;

        for result in &results {
            tracing::info!(
                notification_id = %event.notification_id,
                account_id = event.account_id,
                channel = result.channel.as_str(),
                provider = %result.provider,
                status = ?result.status,
                "dispatch result"
            );
        }

        let any_success = results.iter().any(DeliveryResult::is_success);

        if any_success {
            self.stats.record_delivered();
            if let Some(metrics) = ngw_metrics::metrics() {
                metrics.consumer.record_delivered();
            }
        } else {
            self.record_failed();
            self.handle_exhausted(&event, message).await;
        }
    }

    /// Increments both the correctness-critical counter logged at loop exit
    /// and the ambient OTel-facing copy (spec.md §4.3 "Exit").
    fn record_failed(&self) {
        self.stats.record_failed();
        if let Some(metrics) = ngw_metrics::metrics() {
            metrics.consumer.record_failed();
        }
    }

    /// Exhausted-delivery policy (spec.md §4.3.1): a single ERROR log
    /// always, plus a DLQ publish when configured. The offset for this
    /// record is still committed by the caller's batch commit — exhaustion
    /// never blocks progress.
    async fn handle_exhausted(&self, event: &NotificationEvent, message: &OwnedMessage) {
        tracing::error!(
            notification_id = %event.notification_id,
            notification_type = ?event.notification_type,
            account_id = event.account_id,
            "all configured channels exhausted for this event"
        );

        if self.retry_config.on_exhausted != OnExhausted::Kafka {
            return;
        }

        let Some(dlq) = &self.dlq else {
            tracing::error!(
                notification_id = %event.notification_id,
                "onExhausted=kafka but no DLQ producer wired, degrading to log"
            );
            return;
        };

        if let Err(error) = dlq.publish(message.key(), message.payload().unwrap_or_default()).await {
            tracing::error!(
                notification_id = %event.notification_id,
                %error,
                "failed to publish to DLQ, record will not be re-processed"
            );
        }
    }
}
