//! AppleScript compile/run and application launch via system tools.

use std::{ffi::OsStr, fs, path::Path};

use tracing::debug;

use crate::{AppPath, Result, command};

/// Extension used for the plain-text source written beside a compiled script.
const SOURCE_EXT: &str = "applescript";

/// Write `source` next to `dest` and compile it to `dest` with `osacompile`.
///
/// Both files are overwritten when present.
pub(crate) fn compile(source: &str, dest: &Path) -> Result<()> {
    let src = dest.with_extension(SOURCE_EXT);
    fs::write(&src, source)?;
    command::run("osacompile", [OsStr::new("-o"), dest.as_os_str(), src.as_os_str()])?;
    debug!(dest = %dest.display(), "script_compiled");
    Ok(())
}

/// Execute a compiled script with `osascript`.
pub(crate) fn run(script: &Path) -> Result<()> {
    command::run("osascript", [script.as_os_str()])
}

/// Launch or focus an application bundle with `open`.
///
/// `open` brings an already running application forward instead of
/// spawning a second instance.
pub(crate) fn open(app: &AppPath) -> Result<()> {
    command::run("open", [app.to_path_buf()])
}
