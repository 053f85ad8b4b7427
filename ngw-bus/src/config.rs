//! `bus.*` configuration (spec.md §6): forwarded mostly unchanged onto
//! `rdkafka::ClientConfig`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusConfig {
    pub bootstrap: String,

    #[serde(default = "defaults::group_id")]
    pub group_id: String,

    #[serde(default = "defaults::auto_offset_reset")]
    pub auto_offset_reset: String,

    /// Upper bound on records accumulated into one polled batch. `rdkafka`
    /// has no native batched-poll call (its `StreamConsumer` yields one
    /// message per `recv()`), so this caps the accumulation loop described
    /// in SPEC_FULL.md §4.3 rather than a Kafka client setting.
    #[serde(default = "defaults::max_poll_records")]
    pub max_poll_records: usize,

    #[serde(default = "defaults::session_timeout_ms")]
    pub session_timeout_ms: u64,

    #[serde(default = "defaults::heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// How long to accumulate messages into one batch before dispatching,
    /// regardless of `max_poll_records` (spec.md §4.3 step 1, default
    /// 500ms).
    #[serde(default = "defaults::poll_timeout_ms")]
    pub poll_timeout_ms: u64,

    #[serde(default = "defaults::topics")]
    pub topics: Vec<String>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bootstrap: "localhost:9092".to_string(),
            group_id: defaults::group_id(),
            auto_offset_reset: defaults::auto_offset_reset(),
            max_poll_records: defaults::max_poll_records(),
            session_timeout_ms: defaults::session_timeout_ms(),
            heartbeat_interval_ms: defaults::heartbeat_interval_ms(),
            poll_timeout_ms: defaults::poll_timeout_ms(),
            topics: defaults::topics(),
        }
    }
}

impl BusConfig {
    #[must_use]
    pub fn to_client_config(&self) -> rdkafka::ClientConfig {
        let mut client_config = rdkafka::ClientConfig::new();
        client_config
            .set("bootstrap.servers", &self.bootstrap)
            .set("group.id", &self.group_id)
            .set("auto.offset.reset", &self.auto_offset_reset)
            .set("session.timeout.ms", self.session_timeout_ms.to_string())
            .set("heartbeat.interval.ms", self.heartbeat_interval_ms.to_string())
            .set("enable.auto.commit", "false")
            .set("enable.auto.offset.store", "false");
        client_config
    }
}

mod defaults {
    pub fn group_id() -> String {
        "notification-gateway".to_string()
    }

    pub fn auto_offset_reset() -> String {
        "earliest".to_string()
    }

    pub const fn max_poll_records() -> usize {
        500
    }

    pub const fn session_timeout_ms() -> u64 {
        10_000
    }

    pub const fn heartbeat_interval_ms() -> u64 {
        3_000
    }

    pub const fn poll_timeout_ms() -> u64 {
        500
    }

    pub fn topics() -> Vec<String> {
        vec![
            "notifications.fraud".to_string(),
            "notifications.high-value".to_string(),
            "notifications.balance".to_string(),
            "notifications.dormancy".to_string(),
            "notifications.daily-spend".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_five_topics() {
        assert_eq!(BusConfig::default().topics.len(), 5);
    }

    #[test]
    fn default_poll_timeout_is_500ms() {
        assert_eq!(BusConfig::default().poll_timeout_ms, 500);
    }
}
