//! Quiet-period debouncing on top of tokio timers.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Quiet period applied to search input.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Runs the most recently scheduled future once no new one has been
/// scheduled for the quiet period.
///
/// Only the timer is cancellable. Once it fires, the future is spawned as an
/// independent task and runs to completion even if the debouncer is
/// rescheduled or dropped.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Cancels any pending timer and arms a new one for `fire`.
    pub fn schedule<F>(&mut self, fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel_pending();
        let delay = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(fire);
        }));
    }

    /// Cancels the pending timer. Returns whether one was still waiting.
    pub fn cancel_pending(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        let waiting = !handle.is_finished();
        handle.abort();
        if waiting {
            tracing::trace!("debounce timer cancelled");
        }
        waiting
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
