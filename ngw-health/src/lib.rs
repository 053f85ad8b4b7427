//! Lifecycle gate and health HTTP endpoint (C5, spec.md §4.5, §6).
//!
//! # Endpoints
//!
//! - **`/health`** — 200 while `ready`, 503 otherwise.
//! - **`/health/live`** — always 200.
//! - **`/health/ready`** — 200 while `ready`, 503 otherwise.

mod config;
mod error;
mod gate;
mod server;

pub use config::HealthConfig;
pub use error::HealthError;
pub use gate::{LifecycleGate, new_gate};
pub use server::HealthServer;
