//! C2: the retry executor. Wraps one adapter call, retrying on `FAILURE`
//! with exponential backoff and jitter, while treating `SUCCESS` and
//! `SKIPPED` as immediately final.

pub mod config;
mod delay;
mod executor;

pub use config::RetryConfig;
pub use executor::RetryExecutor;
