use std::{fmt, sync::Arc};

use mac_desktop::{AppPath, DesktopOps};
use tracing::{debug, warn};

use crate::action::{Action, PedalIndex, launch};

/// Focus an app while the pedal is held, then switch back on release.
pub struct QuickSwitch {
    /// Bound pedal.
    pedal: PedalIndex,
    /// App focused on press.
    app: AppPath,
    /// Desktop side effects.
    ops: Arc<dyn DesktopOps>,
}

impl QuickSwitch {
    /// Create a quick switch to `app` on `pedal`.
    pub fn new(pedal: PedalIndex, app: AppPath, ops: Arc<dyn DesktopOps>) -> Self {
        Self { pedal, app, ops }
    }

    /// Target app.
    pub fn app(&self) -> &AppPath {
        &self.app
    }
}

impl Action for QuickSwitch {
    fn pedal(&self) -> PedalIndex {
        self.pedal
    }

    fn on_edge(&mut self, pressed: bool) {
        if pressed {
            launch(self.ops.as_ref(), self.pedal, &self.app);
            return;
        }
        debug!(pedal = self.pedal, "switch_back");
        if let Err(e) = self.ops.cycle_focus() {
            warn!(pedal = self.pedal, error = %e, "switch_back_failed");
        }
    }
}

impl fmt::Debug for QuickSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickSwitch")
            .field("pedal", &self.pedal)
            .field("app", &self.app.as_str())
            .finish()
    }
}
