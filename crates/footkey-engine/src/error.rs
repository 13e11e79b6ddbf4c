use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the footkey engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors originating from the desktop operations layer.
    #[error("Desktop operation failed: {0}")]
    Desktop(#[from] mac_desktop::Error),

    /// I/O failure while preparing action resources.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A modifier key name that is not one of command/shift/option/control.
    #[error("Unknown modifier key: {0}")]
    UnknownModifier(String),
}
