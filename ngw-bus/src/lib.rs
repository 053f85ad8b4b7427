//! C4: the consume-commit loop (spec.md §4.3, §4.4, §9 "At-least-once
//! offset semantics").
//!
//! Owns the bus client exclusively (spec.md §5 "Shared resources"): no
//! other component in the workspace touches the `rdkafka` consumer or
//! producer handles.

pub mod config;
pub mod consumer;
pub mod dlq;
pub mod error;
pub mod stats;

pub use config::BusConfig;
pub use consumer::ConsumeCommitLoop;
pub use dlq::DlqPublisher;
pub use error::BusError;
pub use stats::{ConsumerStats, StatsSnapshot};
