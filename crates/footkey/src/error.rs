//! Error handling for the footkey binary.

use std::{io, result};

use thiserror::Error;
use tokio::task::JoinError;

/// Convenient result type for footkey operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that end a footkey session.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Failed to build the action registry.
    #[error("Binding setup failed: {0}")]
    Engine(#[from] footkey_engine::Error),
    /// The pedal could not be opened or stopped responding.
    #[error("Pedal error: {0}")]
    Pedal(#[from] pedal_device::Error),
    /// The dispatch thread panicked or was cancelled.
    #[error("Dispatch task failed: {0}")]
    Join(#[from] JoinError),
}
