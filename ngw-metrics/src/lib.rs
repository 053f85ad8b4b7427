//! OpenTelemetry metrics for the notification gateway dispatch engine.
//!
//! Exports metrics via OTLP/HTTP to an OpenTelemetry Collector, which can
//! then expose them in Prometheus format for scraping (SPEC_FULL.md §6
//! "Metrics").
//!
//! # Instruments
//!
//! - **[`DispatchMetrics`]** — adapter attempt counts and durations by
//!   channel/provider/status (C3).
//! - **[`RetryMetrics`]** — attempts-per-call histogram (C2).
//! - **[`ConsumerMetrics`]** — batch size/duration, plus the four
//!   received/delivered/skipped/failed counters (C4).
//!
//! # Usage
//!
//! ```rust,no_run
//! use ngw_metrics::{MetricsConfig, init_metrics};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MetricsConfig::default();
//! init_metrics(&config)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod consumer;
mod dispatch;
mod error;
mod exporter;
mod retry;

pub use config::MetricsConfig;
pub use consumer::ConsumerMetrics;
pub use dispatch::DispatchMetrics;
pub use error::MetricsError;
use once_cell::sync::OnceCell;
pub use retry::RetryMetrics;

static METRICS_INSTANCE: OnceCell<Metrics> = OnceCell::new();

/// Root metrics container, installed once at startup.
#[derive(Debug)]
pub struct Metrics {
    pub dispatch: DispatchMetrics,
    pub retry: RetryMetrics,
    pub consumer: ConsumerMetrics,
}

/// Initialize the metrics system. Must be called once at startup before
/// any metrics are recorded. A no-op when `config.enabled` is false.
///
/// # Errors
///
/// Returns an error if metrics initialization fails, or if called more
/// than once.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        tracing::info!("metrics collection is disabled");
        return Ok(());
    }

    tracing::info!(endpoint = %config.endpoint, "initializing OpenTelemetry metrics with OTLP exporter");

    let provider = exporter::init_otlp_exporter(&config.endpoint, config.api_key.as_deref())?;
    opentelemetry::global::set_meter_provider(provider);

    let metrics = Metrics {
        dispatch: DispatchMetrics::new()?,
        retry: RetryMetrics::new()?,
        consumer: ConsumerMetrics::new()?,
    };

    METRICS_INSTANCE.set(metrics).map_err(|_| MetricsError::AlreadyInitialized)?;

    tracing::info!("metrics collection initialized");
    Ok(())
}

/// The global metrics instance, if [`init_metrics`] installed one.
#[must_use]
pub fn metrics() -> Option<&'static Metrics> {
    METRICS_INSTANCE.get()
}

/// True once [`init_metrics`] has installed a global instance.
#[must_use]
pub fn is_enabled() -> bool {
    METRICS_INSTANCE.get().is_some()
}
