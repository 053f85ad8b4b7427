//! Retry executor configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the retry executor: `{ maxAttempts, initialDelayMs,
/// backoffFactor, maxDelayMs }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per adapter call, at least 1.
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "defaults::initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Multiplicative backoff factor applied per attempt, at least 1.0.
    #[serde(default = "defaults::backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound on any single computed delay, in milliseconds.
    #[serde(default = "defaults::max_delay_ms")]
    pub max_delay_ms: u64,

    /// What to do once a channel's fallback walk exhausts every adapter
    /// with `FAILURE`.
    #[serde(default)]
    pub on_exhausted: OnExhausted,

    /// Dead-letter topic to publish to when `on_exhausted = kafka`.
    #[serde(default)]
    pub dlq_topic: Option<String>,
}

/// Exhausted-delivery policy (spec §4.3.1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnExhausted {
    #[default]
    Log,
    Kafka,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            initial_delay_ms: defaults::initial_delay_ms(),
            backoff_factor: defaults::backoff_factor(),
            max_delay_ms: defaults::max_delay_ms(),
            on_exhausted: OnExhausted::default(),
            dlq_topic: None,
        }
    }
}

impl RetryConfig {
    /// `config check` and startup validation: a `kafka` exhaustion policy
    /// with no DLQ topic wired is a configuration error, not a silent
    /// degrade to `log` (see DESIGN.md Open Question 1's sibling decision
    /// in SPEC_FULL.md §4.3.1).
    ///
    /// # Errors
    ///
    /// Returns an error message when `on_exhausted = kafka` but
    /// `dlq_topic` is unset.
    pub fn validate(&self) -> Result<(), String> {
        if self.on_exhausted == OnExhausted::Kafka && self.dlq_topic.is_none() {
            return Err("retry.onExhausted = kafka requires retry.dlqTopic to be set".to_string());
        }
        Ok(())
    }
}

mod defaults {
    pub const fn max_attempts() -> u32 {
        3
    }

    pub const fn initial_delay_ms() -> u64 {
        200
    }

    pub const fn backoff_factor() -> f64 {
        2.0
    }

    pub const fn max_delay_ms() -> u64 {
        30_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_delay_ms, 200);
        assert!((config.backoff_factor - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.max_delay_ms, 30_000);
        assert_eq!(config.on_exhausted, OnExhausted::Log);
    }

    #[test]
    fn kafka_without_dlq_topic_fails_validation() {
        let config = RetryConfig {
            on_exhausted: OnExhausted::Kafka,
            dlq_topic: None,
            ..RetryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn kafka_with_dlq_topic_is_valid() {
        let config = RetryConfig {
            on_exhausted: OnExhausted::Kafka,
            dlq_topic: Some("notify.dlq".to_string()),
            ..RetryConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
