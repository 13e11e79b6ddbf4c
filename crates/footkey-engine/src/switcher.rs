use std::{fmt, sync::Arc};

use mac_desktop::{AppPath, DesktopOps};
use tracing::warn;

use crate::{
    action::{Action, PedalIndex, launch},
    cycle::AppCycle,
};

/// Launch the next app of a fixed list on each press.
///
/// The cursor persists across presses and wraps forever; release is ignored.
pub struct Switcher {
    /// Bound pedal.
    pedal: PedalIndex,
    /// Cursor over the configured apps.
    cycle: AppCycle,
    /// Desktop side effects.
    ops: Arc<dyn DesktopOps>,
}

impl Switcher {
    /// Create a switcher over `apps` on `pedal`.
    pub fn new(
        pedal: PedalIndex,
        apps: impl IntoIterator<Item = AppPath>,
        ops: Arc<dyn DesktopOps>,
    ) -> Self {
        Self {
            pedal,
            cycle: AppCycle::new(apps.into_iter().collect()),
            ops,
        }
    }

    /// Configured apps, in cycle order.
    pub fn apps(&self) -> &[AppPath] {
        self.cycle.fixed()
    }

    /// Advance the cursor one position.
    pub fn next_app(&mut self) -> Option<AppPath> {
        self.cycle.next_fixed()
    }
}

impl Action for Switcher {
    fn pedal(&self) -> PedalIndex {
        self.pedal
    }

    fn on_edge(&mut self, pressed: bool) {
        if !pressed {
            return;
        }
        match self.next_app() {
            Some(app) => launch(self.ops.as_ref(), self.pedal, &app),
            None => warn!(pedal = self.pedal, "switcher_empty"),
        }
    }
}

impl fmt::Debug for Switcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switcher")
            .field("pedal", &self.pedal)
            .field(
                "apps",
                &self.apps().iter().map(AppPath::as_str).collect::<Vec<_>>(),
            )
            .finish()
    }
}
