//! Scheduler control state.
//!
//! Shared between the scheduler task and whoever drives it (the engine's
//! Ctrl-C handler, tests). Pausing makes the scheduler skip ticks as they
//! come due; a stop request prevents any new tick from starting and lets
//! the in-flight one finish.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Pause / resume / stop flags for a running scheduler.
#[derive(Debug, Default)]
pub struct SchedulerControl {
    /// Whether due ticks are currently skipped.
    paused: AtomicBool,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes the scheduler when a stop is requested.
    stop_notify: Notify,
}

impl SchedulerControl {
    /// Create a running (unpaused, not stopping) control.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether ticks are being skipped.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Skip ticks until [`resume`](Self::resume) is called.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Run ticks again as they come due.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop and wake the scheduler.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Resolve once a stop has been requested.
    ///
    /// Returns immediately if the request already happened.
    pub async fn stopped(&self) {
        loop {
            // Register before checking the flag so a concurrent request is
            // not missed.
            let notified = self.stop_notify.notified();
            if self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn pause_and_resume() {
        let control = SchedulerControl::new();
        assert!(!control.is_paused());
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }

    #[tokio::test]
    async fn stopped_returns_after_request() {
        let control = Arc::new(SchedulerControl::new());
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { control.stopped().await })
        };
        tokio::task::yield_now().await;
        control.request_stop();
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn stopped_is_immediate_when_already_requested() {
        let control = SchedulerControl::new();
        control.request_stop();
        control.stopped().await;
        assert!(control.is_stop_requested());
    }
}
