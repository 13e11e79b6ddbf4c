//! Command-line interface definitions for footkey.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `footkey` binary.
#[derive(Parser, Debug)]
#[command(
    name = "footkey",
    about = "Map Stream Deck Pedal presses to app switching and held modifier keys",
    version
)]
pub struct Cli {
    /// Logging controls shared across footkey binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Print the registered bindings and attached pedals, then exit.
    #[arg(long)]
    pub list: bool,

    /// End the session after this long, e.g. `40s` or `2h`. Runs until Ctrl-C
    /// when omitted.
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub session: Option<Duration>,

    /// Directory for the compiled modifier scripts (defaults to the system
    /// temp dir).
    #[arg(long, value_name = "PATH")]
    pub script_dir: Option<PathBuf>,
}
