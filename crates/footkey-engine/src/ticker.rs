//! Ticker for scheduling a repeated closure with cancellation support.
//!
//! Runs a callback after an initial delay and then on a fixed interval on the
//! Tokio runtime. Stopping cancels the task at its next await point; dropping
//! the ticker stops it.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Maximum time to wait for a ticker task to acknowledge cancellation.
pub const STOP_WAIT_TIMEOUT_MS: u64 = 50;

/// Running task state.
struct TickerEntry {
    /// Cancels the task.
    token: CancellationToken,
    /// Task handle, awaited by [`Ticker::stop_and_wait`].
    handle: JoinHandle<()>,
}

/// Single periodic task: `on_tick` after `initial`, then every `interval`.
///
/// Missed ticks are skipped rather than bursted.
pub struct Ticker {
    /// Name used in trace output.
    name: &'static str,
    /// The active task, if started.
    entry: Mutex<Option<TickerEntry>>,
}

impl Ticker {
    /// Create an idle ticker.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entry: Mutex::new(None),
        }
    }

    /// True while a task is scheduled and not stopped.
    pub fn is_active(&self) -> bool {
        self.entry
            .lock()
            .as_ref()
            .is_some_and(|e| !e.handle.is_finished())
    }

    /// Start or replace the task.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start<F>(&self, initial: Duration, interval: Duration, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        let token = CancellationToken::new();
        let cancel = token.clone();
        let name = self.name;

        let fut = async move {
            trace!(
                ticker = name,
                init_ms = initial.as_millis(),
                int_ms = interval.as_millis(),
                "ticker_start"
            );

            tokio::select! {
                _ = time::sleep(initial) => {}
                _ = cancel.cancelled() => {
                    trace!(ticker = name, "ticker_cancelled_initial");
                    return;
                }
            }

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        trace!(ticker = name, "ticker_cancelled");
                        return;
                    }
                    _ = ticker.tick() => {
                        on_tick();
                    }
                }
            }
        };

        let handle = tokio::spawn(fut);
        *self.entry.lock() = Some(TickerEntry { token, handle });
    }

    /// Stop the task if present (non-blocking).
    pub fn stop(&self) {
        if let Some(entry) = self.entry.lock().take() {
            entry.token.cancel();
            trace!(ticker = self.name, "ticker_stop");
        }
    }

    /// Stop the task and wait briefly for it to finish.
    pub async fn stop_and_wait(&self) {
        let entry = self.entry.lock().take();
        if let Some(entry) = entry {
            entry.token.cancel();
            let _ = time::timeout(Duration::from_millis(STOP_WAIT_TIMEOUT_MS), entry.handle).await;
            trace!(ticker = self.name, "ticker_stop_wait");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
