//! Backoff delay calculation.
//!
//! `delay(n) = min(initialDelayMs * backoffFactor^(n-1) + uniformRandom[0,
//! initialDelayMs), maxDelayMs)`, re-sampling the jitter term on every call.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Compute the delay before attempt `n` (1-indexed: the delay awaited
/// *after* attempt `n` fails, before attempt `n + 1`).
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn next_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let base = (config.initial_delay_ms as f64) * config.backoff_factor.powi(exponent as i32);

    let jitter = if config.initial_delay_ms == 0 {
        0.0
    } else {
        rand::rng().random_range(0.0..(config.initial_delay_ms as f64))
    };

    let delay_ms = (base + jitter).min(config.max_delay_ms as f64).max(0.0);
    Duration::from_millis(delay_ms as u64)
}
