//! `metrics.*` configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Enable or disable metrics collection. When disabled, `init_metrics`
    /// is a no-op and the global instrument accessor is never installed.
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// OTLP endpoint metrics are pushed to (an OpenTelemetry Collector,
    /// typically), which can then expose them for Prometheus to scrape.
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Optional bearer token sent as `Authorization: Bearer <api_key>`
    /// with every OTLP export.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            endpoint: defaults::endpoint(),
            api_key: None,
        }
    }
}

mod defaults {
    pub const fn enabled() -> bool {
        true
    }

    pub fn endpoint() -> String {
        "http://localhost:4318/v1/metrics".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled_with_local_collector_endpoint() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.endpoint, "http://localhost:4318/v1/metrics");
    }
}
