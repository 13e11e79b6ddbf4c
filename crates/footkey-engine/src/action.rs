use std::fmt;

use mac_desktop::{AppPath, DesktopOps};
use tracing::{debug, warn};

/// Index of a physical pedal; the identity key into the registry.
pub type PedalIndex = u8;

/// A single press or release transition reported for a pedal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Pedal that changed.
    pub pedal: PedalIndex,
    /// True on press, false on release.
    pub pressed: bool,
}

impl EdgeEvent {
    /// Press edge for `pedal`.
    pub fn press(pedal: PedalIndex) -> Self {
        Self {
            pedal,
            pressed: true,
        }
    }

    /// Release edge for `pedal`.
    pub fn release(pedal: PedalIndex) -> Self {
        Self {
            pedal,
            pressed: false,
        }
    }
}

/// Behavior bound to a pedal, invoked on every edge.
///
/// The pedal index is fixed at construction. `on_edge` runs synchronously on
/// the dispatch thread and must absorb its own failures.
pub trait Action: Send + fmt::Debug {
    /// Pedal this action is bound to.
    fn pedal(&self) -> PedalIndex;

    /// Handle a press (`true`) or release (`false`).
    fn on_edge(&mut self, pressed: bool);
}

/// Launch or focus `app`, logging failures.
pub(crate) fn launch(ops: &dyn DesktopOps, pedal: PedalIndex, app: &AppPath) {
    debug!(pedal, app = %app, "launch");
    if let Err(e) = ops.open_app(app) {
        warn!(pedal, app = %app, error = %e, "launch_failed");
    }
}
