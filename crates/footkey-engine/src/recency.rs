//! Recently focused applications.
//!
//! [`RecencyTracker`] polls the frontmost application on a fixed interval and
//! feeds [`RecencyHistory`], a bounded FIFO read by the adaptive switcher.

use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
    time::Duration,
};

use mac_desktop::{AppPath, DesktopOps};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::ticker::Ticker;

/// Default interval between frontmost-app polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Recency tracker configuration.
#[derive(Clone, Copy, Debug)]
pub struct TrackerCfg {
    /// Delay between polls; the first poll happens one interval after start.
    pub interval: Duration,
}

impl Default for TrackerCfg {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Outcome of offering an app to the history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The app is part of the fixed list and never tracked.
    Fixed,
    /// The app is already in the window.
    AlreadyRecent,
    /// The window has zero capacity.
    NoCapacity,
    /// The app was appended, evicting the oldest entry when full.
    Added {
        /// Entry dropped to make room, if any.
        evicted: Option<AppPath>,
    },
}

/// Bounded, insertion-ordered window of recently focused apps.
///
/// One writer (the tracker task) and one reader (the dispatch thread) share it
/// behind a mutex.
#[derive(Debug)]
pub struct RecencyHistory {
    /// Maximum number of entries.
    capacity: usize,
    /// Oldest first.
    entries: Mutex<VecDeque<AppPath>>,
}

impl RecencyHistory {
    /// Create an empty window holding at most `capacity` apps.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<AppPath> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Offer `app`; members of `fixed` and apps already present are ignored.
    pub fn observe(&self, app: AppPath, fixed: &HashSet<AppPath>) -> Observation {
        if fixed.contains(&app) {
            return Observation::Fixed;
        }
        let mut entries = self.entries.lock();
        if entries.contains(&app) {
            return Observation::AlreadyRecent;
        }
        if self.capacity == 0 {
            return Observation::NoCapacity;
        }
        let evicted = if entries.len() >= self.capacity {
            entries.pop_front()
        } else {
            None
        };
        entries.push_back(app);
        Observation::Added { evicted }
    }
}

/// Background poller feeding a [`RecencyHistory`].
///
/// The polling task is cancelled when the tracker is dropped.
pub struct RecencyTracker {
    /// Shared window.
    history: Arc<RecencyHistory>,
    /// Periodic poll task.
    ticker: Ticker,
}

impl RecencyTracker {
    /// Start polling `ops` for the frontmost app.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(
        fixed: &[AppPath],
        history: Arc<RecencyHistory>,
        ops: Arc<dyn DesktopOps>,
        cfg: TrackerCfg,
    ) -> Self {
        let fixed: HashSet<AppPath> = fixed.iter().cloned().collect();
        let ticker = Ticker::new("recency");
        let hist = history.clone();
        ticker.start(cfg.interval, cfg.interval, move || {
            poll_once(ops.as_ref(), &fixed, &hist);
        });
        Self { history, ticker }
    }

    /// The shared window.
    pub fn history(&self) -> &Arc<RecencyHistory> {
        &self.history
    }

    /// True while the poll task is running.
    pub fn is_running(&self) -> bool {
        self.ticker.is_active()
    }

    /// Stop polling and wait briefly for the task to finish.
    pub async fn shutdown(&self) {
        self.ticker.stop_and_wait().await;
    }
}

/// One poll: query the frontmost app and offer it to the window.
fn poll_once(ops: &dyn DesktopOps, fixed: &HashSet<AppPath>, history: &RecencyHistory) {
    let app = match ops.active_app() {
        Ok(app) => app,
        Err(e) => {
            debug!(error = %e, "recency_poll_failed");
            return;
        }
    };
    match history.observe(app.clone(), fixed) {
        Observation::Added { evicted } => {
            debug!(
                app = %app,
                evicted = ?evicted.as_ref().map(AppPath::as_str),
                "recent_app_added"
            );
        }
        other => trace!(app = %app, outcome = ?other, "recent_app_ignored"),
    }
}

#[cfg(test)]
mod tests {
    use mac_desktop::MockDesktopOps;

    use super::*;

    fn app(name: &str) -> AppPath {
        AppPath::resolve_with_home(name, None)
    }

    fn fixed(names: &[&str]) -> HashSet<AppPath> {
        names.iter().map(|n| app(n)).collect()
    }

    #[test]
    fn fixed_apps_are_never_recorded() {
        let h = RecencyHistory::new(2);
        let f = fixed(&["X.app"]);
        assert_eq!(h.observe(app("X.app"), &f), Observation::Fixed);
        assert!(h.is_empty());
    }

    #[test]
    fn duplicates_are_ignored() {
        let h = RecencyHistory::new(2);
        let f = HashSet::new();
        assert_eq!(
            h.observe(app("Z.app"), &f),
            Observation::Added { evicted: None }
        );
        assert_eq!(h.observe(app("Z.app"), &f), Observation::AlreadyRecent);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn eviction_is_oldest_first_and_bounded() {
        let h = RecencyHistory::new(2);
        let f = HashSet::new();
        h.observe(app("A.app"), &f);
        h.observe(app("B.app"), &f);
        assert_eq!(
            h.observe(app("C.app"), &f),
            Observation::Added {
                evicted: Some(app("A.app"))
            }
        );
        assert_eq!(h.snapshot(), vec![app("B.app"), app("C.app")]);
        assert_eq!(
            h.observe(app("D.app"), &f),
            Observation::Added {
                evicted: Some(app("B.app"))
            }
        );
        assert_eq!(h.snapshot(), vec![app("C.app"), app("D.app")]);
        assert!(h.len() <= h.capacity());
    }

    #[test]
    fn re_seeing_an_entry_does_not_refresh_it() {
        let h = RecencyHistory::new(2);
        let f = HashSet::new();
        h.observe(app("A.app"), &f);
        h.observe(app("B.app"), &f);
        h.observe(app("A.app"), &f);
        h.observe(app("C.app"), &f);
        assert_eq!(h.snapshot(), vec![app("B.app"), app("C.app")]);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let h = RecencyHistory::new(0);
        assert_eq!(
            h.observe(app("A.app"), &HashSet::new()),
            Observation::NoCapacity
        );
        assert!(h.is_empty());
    }

    #[test]
    fn poll_failure_leaves_history_untouched() {
        let ops = MockDesktopOps::new();
        let h = RecencyHistory::new(1);
        poll_once(&ops, &HashSet::new(), &h);
        assert!(h.is_empty());
        ops.set_active(Some(app("Z.app")));
        poll_once(&ops, &HashSet::new(), &h);
        assert_eq!(h.snapshot(), vec![app("Z.app")]);
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_polls_on_interval_until_dropped() {
        let ops = Arc::new(MockDesktopOps::new());
        ops.set_active(Some(app("Z.app")));
        let history = Arc::new(RecencyHistory::new(2));
        let tracker = RecencyTracker::start(
            &[app("X.app")],
            history.clone(),
            ops.clone(),
            TrackerCfg::default(),
        );
        assert!(tracker.is_running());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ops.active_queries(), 0);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(history.snapshot(), vec![app("Z.app")]);

        ops.set_active(Some(app("X.app")));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(history.snapshot(), vec![app("Z.app")]);

        ops.set_active(Some(app("W.app")));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(history.snapshot(), vec![app("Z.app"), app("W.app")]);

        let polls = ops.active_queries();
        tracker.shutdown().await;
        drop(tracker);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ops.active_queries(), polls);
    }
}
