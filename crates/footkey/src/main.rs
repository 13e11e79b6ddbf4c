#![warn(missing_docs)]

//! Entry point for the `footkey` binary.

mod bindings;
mod cli;
mod error;

use std::{env, future, path::Path, process, sync::Arc, time::Duration};

use clap::Parser;
use footkey_engine::{ActionRegistry, Dispatcher, ExitHooks};
use mac_desktop::{DesktopOps, RealDesktopOps};
use pedal_device::{PedalCfg, StreamDeckPedal};
use tokio::{runtime, signal, task, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{cli::Cli, error::Result};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and run one session.
///
/// Exit hooks run when this returns, whatever the outcome.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_spec = cli.log.spec();
    let env_filter = logging::env_filter_from_spec(&log_spec);
    registry()
        .with(env_filter)
        .with(fmt::layer().without_time())
        .try_init()
        .ok();

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let hooks = ExitHooks::new();
    let _release = hooks.guard();
    rt.block_on(session(cli, &hooks))
}

/// Register bindings, then dispatch pedal edges until the session ends.
async fn session(cli: Cli, hooks: &ExitHooks) -> Result<()> {
    let ops: Arc<dyn DesktopOps> = Arc::new(RealDesktopOps);
    let script_dir = cli.script_dir.clone().unwrap_or_else(env::temp_dir);
    let registry = bindings::default_registry(&ops, &script_dir, hooks)?;

    if cli.list {
        print_listing(&registry, &script_dir);
        return Ok(());
    }
    for (pedal, action) in registry.list_registered() {
        info!(pedal, action = ?action, "binding");
    }

    let stop = CancellationToken::new();
    let task_stop = stop.clone();
    let mut dispatch = task::spawn_blocking(move || -> Result<()> {
        let pedal = StreamDeckPedal::open(PedalCfg::default())?;
        Dispatcher::new(pedal, registry).run(&task_stop)?;
        Ok(())
    });

    tokio::select! {
        res = &mut dispatch => {
            // Device open or read failure.
            return res?;
        }
        res = signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "ctrl_c_listener_failed");
            }
            info!("interrupted");
        }
        () = session_timer(cli.session) => info!("session_elapsed"),
    }

    stop.cancel();
    let res = dispatch.await?;
    debug!("session_done");
    res
}

/// Resolves after `--session`, or never.
async fn session_timer(limit: Option<Duration>) {
    match limit {
        Some(d) => time::sleep(d).await,
        None => future::pending().await,
    }
}

/// Print bindings and attached pedals for `--list`.
fn print_listing(registry: &ActionRegistry, script_dir: &Path) {
    println!("bindings:");
    for (pedal, action) in registry.list_registered() {
        println!("  {pedal}: {action:?}");
    }
    println!("scripts: {}", script_dir.display());
    match pedal_device::enumerate(&PedalCfg::default()) {
        Ok(found) if found.is_empty() => println!("pedals: none attached"),
        Ok(found) => {
            println!("pedals:");
            for p in found {
                let id = p
                    .serial
                    .unwrap_or_else(|| p.path.to_string_lossy().into_owned());
                println!("  {} ({id})", p.product.as_deref().unwrap_or("unknown"));
            }
        }
        Err(e) => warn!(error = %e, "pedal_enumeration_failed"),
    }
}
