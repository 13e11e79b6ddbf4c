//! Blocking helpers for running external programs.

use std::{ffi::OsStr, process::Command};

use tracing::trace;

use crate::{Error, Result};

/// Run `program` with `args`, waiting for it to exit.
///
/// A non-zero exit status becomes [`Error::CommandFailed`] carrying the
/// trimmed stderr output.
pub(crate) fn run<I, S>(program: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    trace!(program, args = ?cmd.get_args().collect::<Vec<_>>(), "run_command");
    let output = cmd.output()?;
    if output.status.success() {
        return Ok(());
    }
    Err(Error::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
