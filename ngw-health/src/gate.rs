//! The lifecycle gate (C5, spec.md §4.5): two observable flags plus the
//! cancellable-wait signal threaded through `ngw-retry` and `ngw-bus`.
//!
//! The two flags are plain atomics under relaxed ordering (spec.md §5
//! "need no synchronization for correctness"); the shutdown signal itself
//! is a `tokio::sync::watch` bool since every waiter only ever cares about
//! the latest value, not each transition.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Startup/shutdown coordination shared by the consumer loop and the
/// health HTTP server (spec.md §4.5).
#[derive(Debug)]
pub struct LifecycleGate {
    ready: AtomicBool,
    running: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleGate {
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, _rx) = watch::channel(false);
        Self { ready: AtomicBool::new(false), running: AtomicBool::new(true), shutdown_tx }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Flip `ready` to true. Called immediately before the consumer enters
    /// its polling loop (spec.md §4.5 point 1).
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
        tracing::info!("lifecycle gate ready");
    }

    /// A fresh receiver over the shutdown signal. Every subscriber sees the
    /// same latest value; `ngw-retry`'s cancellable sleep and `ngw-bus`'s
    /// poll loop each hold their own clone.
    #[must_use]
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Begin shutdown (spec.md §4.5 points 1-2): `ready` false, `running`
    /// false, and wake every waiter on the shutdown channel. The bounded
    /// grace-then-abort wait (point 3-4) and the close ordering (point 5)
    /// are the caller's responsibility — this only flips the flags.
    pub fn begin_shutdown(&self) {
        self.ready.store(false, Ordering::Relaxed);
        self.running.store(false, Ordering::Relaxed);
        let _ = self.shutdown_tx.send(true);
        tracing::info!("lifecycle gate shutdown begun");
    }
}

#[must_use]
pub fn new_gate() -> Arc<LifecycleGate> {
    Arc::new(LifecycleGate::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready_but_running() {
        let gate = LifecycleGate::new();
        assert!(!gate.is_ready());
        assert!(gate.is_running());
    }

    #[test]
    fn mark_ready_flips_ready_only() {
        let gate = LifecycleGate::new();
        gate.mark_ready();
        assert!(gate.is_ready());
        assert!(gate.is_running());
    }

    #[tokio::test]
    async fn begin_shutdown_flips_both_and_wakes_waiters() {
        let gate = LifecycleGate::new();
        gate.mark_ready();
        let mut signal = gate.shutdown_signal();

        gate.begin_shutdown();

        assert!(!gate.is_ready());
        assert!(!gate.is_running());
        signal.changed().await.expect("sender still alive");
        assert!(*signal.borrow());
    }
}
