//! footkey engine
//!
//! The engine maps pedal edge events to actions:
//! - [`ActionRegistry`] owns one [`Action`] per pedal and dispatches edges
//! - [`QuickSwitch`] focuses an app while held and switches back on release
//! - [`Switcher`] launches the next app of a fixed list on each press
//! - [`AdaptiveSwitcher`] extends the list with recently focused apps tracked
//!   by a background [`RecencyTracker`]
//! - [`Modifier`] holds a modifier key down while the pedal is pressed, with a
//!   release registered in [`ExitHooks`]
//! - [`Dispatcher`] drives an [`EdgeSource`] into a registry
//!
//! Side effects go through [`mac_desktop::DesktopOps`]; failures are logged and
//! absorbed at the action boundary so one misbehaving pedal never stops the
//! others.

mod action;
mod adaptive;
mod cycle;
mod dispatcher;
mod error;
mod exit_hooks;
mod modifier;
mod quick_switch;
mod recency;
mod registry;
mod switcher;
mod ticker;

pub use action::{Action, EdgeEvent, PedalIndex};
pub use adaptive::AdaptiveSwitcher;
pub use cycle::AppCycle;
pub use dispatcher::{Dispatcher, EdgeSource, ScriptedSource};
pub use error::{Error, Result};
pub use exit_hooks::{ExitGuard, ExitHooks};
pub use modifier::{KeyDirection, Modifier, ModifierKey, ScriptPair, script_source};
pub use quick_switch::QuickSwitch;
pub use recency::{Observation, RecencyHistory, RecencyTracker, TrackerCfg};
pub use registry::ActionRegistry;
pub use switcher::Switcher;
pub use ticker::Ticker;
