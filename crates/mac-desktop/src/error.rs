//! Error types and result alias for the mac-desktop crate.
use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Crate-local `Result` alias.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised by desktop operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while spawning a process or writing a script.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An external command ran but exited unsuccessfully.
    #[error("{program} failed (code {code:?}): {stderr}")]
    CommandFailed {
        /// Program name, e.g. `osascript`.
        program: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Trimmed stderr output.
        stderr: String,
    },

    /// No frontmost application could be determined.
    #[error("No frontmost application")]
    NoFrontmostApp,

    /// Failure creating a CoreGraphics event source.
    #[error("Failed to create CGEventSource")]
    EventSource,

    /// Failure creating a CoreGraphics keyboard event.
    #[error("Failed to create CGEvent")]
    EventCreate,

    /// The operation is only available on macOS.
    #[error("Unsupported on this platform: {0}")]
    Unsupported(&'static str),
}
