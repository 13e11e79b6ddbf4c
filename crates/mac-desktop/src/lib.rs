//! macOS desktop operations used by footkey actions.
//!
//! This crate wraps the handful of OS side effects that pedal actions need:
//! - launching (or re-focusing) an application bundle via `open`
//! - querying the frontmost application's bundle path
//! - posting the cmd+tab gesture to return to the previous application
//! - compiling and running AppleScript artifacts (`osacompile`/`osascript`)
//!
//! Callers talk to the [`DesktopOps`] trait so tests can swap in
//! [`MockDesktopOps`] (enabled with the `test-utils` feature).
//!
//! Application identity is carried by [`AppPath`], which normalizes names,
//! `~` paths and absolute paths into one escaped representation so that
//! configured and queried paths compare equal.
#![warn(unsafe_op_in_unsafe_fn)]

mod app_path;
mod command;
mod error;
mod frontmost;
mod keys;
mod ops;
mod script;

pub use app_path::{APPLICATIONS_DIR, AppPath};
pub use error::{Error, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use ops::MockDesktopOps;
pub use ops::{DesktopOps, RealDesktopOps};
