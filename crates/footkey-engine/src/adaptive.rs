use std::{fmt, sync::Arc};

use mac_desktop::{AppPath, DesktopOps};
use tracing::{debug, trace, warn};

use crate::{
    action::{Action, PedalIndex, launch},
    cycle::AppCycle,
    recency::{RecencyHistory, RecencyTracker, TrackerCfg},
};

/// Switcher over a fixed list extended by recently focused apps.
///
/// Each press launches the next app of `fixed ++ recent`, where `recent` is a
/// snapshot of the [`RecencyHistory`] taken once per lap. When the next app is
/// already frontmost the cursor advances one extra step; only a single skip is
/// made per press, so a repeat can still come up after it.
pub struct AdaptiveSwitcher {
    /// Bound pedal.
    pedal: PedalIndex,
    /// Cursor over `fixed ++ recent`.
    cycle: AppCycle,
    /// Background poller; dropping it stops polling.
    tracker: RecencyTracker,
    /// Desktop side effects.
    ops: Arc<dyn DesktopOps>,
}

impl AdaptiveSwitcher {
    /// Create a switcher tracking up to `num_recent` extra apps.
    ///
    /// Starts the recency tracker, so this must be called within a Tokio
    /// runtime.
    pub fn new(
        pedal: PedalIndex,
        apps: impl IntoIterator<Item = AppPath>,
        num_recent: usize,
        ops: Arc<dyn DesktopOps>,
    ) -> Self {
        Self::with_cfg(pedal, apps, num_recent, ops, TrackerCfg::default())
    }

    /// Same as [`AdaptiveSwitcher::new`] with explicit tracker settings.
    pub fn with_cfg(
        pedal: PedalIndex,
        apps: impl IntoIterator<Item = AppPath>,
        num_recent: usize,
        ops: Arc<dyn DesktopOps>,
        cfg: TrackerCfg,
    ) -> Self {
        let fixed: Vec<AppPath> = apps.into_iter().collect();
        let history = Arc::new(RecencyHistory::new(num_recent));
        let tracker = RecencyTracker::start(&fixed, history, ops.clone(), cfg);
        Self {
            pedal,
            cycle: AppCycle::new(fixed),
            tracker,
            ops,
        }
    }

    /// Configured apps.
    pub fn apps(&self) -> &[AppPath] {
        self.cycle.fixed()
    }

    /// Current recency window, oldest first.
    pub fn recent(&self) -> Vec<AppPath> {
        self.tracker.history().snapshot()
    }

    /// The recency tracker feeding this switcher.
    pub fn tracker(&self) -> &RecencyTracker {
        &self.tracker
    }

    /// Advance the cursor one position without the skip rule.
    pub fn next_app(&mut self) -> Option<AppPath> {
        let history = self.tracker.history();
        self.cycle.next_with(|| history.snapshot())
    }

    /// Next app to launch, applying the single skip over the frontmost app.
    fn pick(&mut self) -> Option<AppPath> {
        let next = self.next_app()?;
        match self.ops.active_app() {
            Ok(active) if active == next => {
                trace!(pedal = self.pedal, app = %next, "skip_active_app");
                self.next_app().or(Some(next))
            }
            Ok(_) => Some(next),
            Err(e) => {
                debug!(pedal = self.pedal, error = %e, "active_app_query_failed");
                Some(next)
            }
        }
    }
}

impl Action for AdaptiveSwitcher {
    fn pedal(&self) -> PedalIndex {
        self.pedal
    }

    fn on_edge(&mut self, pressed: bool) {
        if !pressed {
            return;
        }
        match self.pick() {
            Some(app) => launch(self.ops.as_ref(), self.pedal, &app),
            None => warn!(pedal = self.pedal, "switcher_empty"),
        }
    }
}

impl fmt::Debug for AdaptiveSwitcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveSwitcher")
            .field("pedal", &self.pedal)
            .field(
                "apps",
                &self.apps().iter().map(AppPath::as_str).collect::<Vec<_>>(),
            )
            .field("num_recent", &self.tracker.history().capacity())
            .finish()
    }
}
