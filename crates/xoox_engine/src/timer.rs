//! Cancellable scheduled callbacks.
//!
//! A [`TimerHandle`] owns a spawned tokio task. Cancelling or dropping the
//! handle aborts the task, so a callback can never outlive the handle that
//! scheduled it. Must be created inside a tokio runtime.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{instrument, trace};

/// Handle to a scheduled one-shot or recurring callback.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Runs `callback` once after `delay`.
    #[instrument(skip(callback))]
    pub fn after<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            trace!("One-shot timer fired");
            callback();
        });
        Self { task }
    }

    /// Runs `callback` every `period`, first after one full period.
    ///
    /// Stops when `callback` returns false.
    #[instrument(skip(callback))]
    pub fn every<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !callback() {
                    trace!("Recurring timer stopped by callback");
                    break;
                }
            }
        });
        Self { task }
    }

    /// Cancels the callback. Equivalent to dropping the handle.
    pub fn cancel(self) {}

    /// True once the task has completed or been aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
