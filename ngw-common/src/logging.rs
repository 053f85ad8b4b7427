//! Structured logging setup, shared by every binary and test harness in the
//! workspace.

use chrono::Utc;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{
    Layer, filter::FilterFn, fmt::time::FormatTime, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

struct Time;

impl FormatTime for Time {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let time = Utc::now();
        w.write_fmt(format_args!("{:?}", time.timestamp_micros()))
    }
}

/// Emit a structured log event under the `internal` span.
#[macro_export]
macro_rules! internal {
    (level = $level:ident, $($msg:expr),*) => {{
        let span = $crate::tracing::span!(target: "ngw", $crate::tracing::Level::$level, "internal");
        let _enter = span.enter();
        $crate::tracing::event!(target: "ngw", $crate::tracing::Level::$level, $($msg),*)
    }};

    ($($msg:expr),*) => {
        $crate::internal!(level = TRACE, $($msg),*)
    };
}

/// Initialise the global `tracing` subscriber.
///
/// `LOG_LEVEL` (warn/info/trace, defaulting to error) takes precedence;
/// absent that, `RUST_LOG` is honored via `EnvFilter`; absent both, the
/// level defaults to TRACE in debug builds and INFO in release.
pub fn init() {
    let level = if let Ok(level) = std::env::var("LOG_LEVEL") {
        match level.to_ascii_lowercase().as_str() {
            "warn" => LevelFilter::WARN,
            "info" => LevelFilter::INFO,
            "trace" => LevelFilter::TRACE,
            _ => LevelFilter::ERROR,
        }
    } else if cfg!(debug_assertions) {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::Registry::default()
        .with(
            (if cfg!(debug_assertions) {
                tracing_subscriber::fmt::layer()
            } else {
                tracing_subscriber::fmt::layer()
                    .with_file(false)
                    .with_line_number(false)
            })
            .compact()
            .with_ansi(true)
            .with_timer(Time)
            .with_target(false)
            .with_filter(env_filter)
            .with_filter(FilterFn::new(|metadata| metadata.target().starts_with("ngw"))),
        )
        .init();
}
