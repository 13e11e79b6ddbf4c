use std::path::Path;

use crate::{AppPath, Result, frontmost, keys, script};

/// Trait abstraction over desktop side effects to improve testability.
pub trait DesktopOps: Send + Sync {
    /// Launch the application, or bring it forward if already running.
    fn open_app(&self, app: &AppPath) -> Result<()>;
    /// Path of the currently focused application.
    fn active_app(&self) -> Result<AppPath>;
    /// Perform the "switch to previous application" gesture.
    fn cycle_focus(&self) -> Result<()>;
    /// Compile AppleScript `source` into the artifact at `dest`, overwriting it.
    fn compile_script(&self, source: &str, dest: &Path) -> Result<()>;
    /// Run a previously compiled script, blocking until it exits.
    fn run_script(&self, script: &Path) -> Result<()>;
}

/// Production implementation backed by macOS tools and frameworks.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealDesktopOps;

impl DesktopOps for RealDesktopOps {
    fn open_app(&self, app: &AppPath) -> Result<()> {
        script::open(app)
    }
    fn active_app(&self) -> Result<AppPath> {
        frontmost::frontmost_bundle_path().map(|p| AppPath::resolve(&p))
    }
    fn cycle_focus(&self) -> Result<()> {
        keys::post_cycle_focus()
    }
    fn compile_script(&self, source: &str, dest: &Path) -> Result<()> {
        script::compile(source, dest)
    }
    fn run_script(&self, script: &Path) -> Result<()> {
        script::run(script)
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::{
        path::{Path, PathBuf},
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
    };

    use parking_lot::Mutex;

    use super::DesktopOps;
    use crate::{AppPath, Error, Result};

    /// Recording mock for tests (enabled with the `test-utils` feature).
    ///
    /// Opening an app makes it the active app, mirroring what the OS does.
    #[derive(Clone, Default)]
    pub struct MockDesktopOps {
        calls: Arc<Mutex<Vec<String>>>,
        launched: Arc<Mutex<Vec<AppPath>>>,
        active: Arc<Mutex<Option<AppPath>>>,
        compiled: Arc<Mutex<Vec<(PathBuf, String)>>>,
        scripts_run: Arc<Mutex<Vec<PathBuf>>>,
        cycles: Arc<AtomicUsize>,
        active_queries: Arc<AtomicUsize>,
        fail_open: Arc<AtomicBool>,
        fail_scripts: Arc<AtomicBool>,
    }

    impl MockDesktopOps {
        /// Create a mock with no active app.
        pub fn new() -> Self {
            Self::default()
        }
        /// Set the app reported by `active_app`.
        pub fn set_active(&self, app: Option<AppPath>) {
            *self.active.lock() = app;
        }
        /// Make `open_app` fail.
        pub fn set_fail_open(&self, v: bool) {
            self.fail_open.store(v, Ordering::SeqCst);
        }
        /// Make `compile_script` and `run_script` fail.
        pub fn set_fail_scripts(&self, v: bool) {
            self.fail_scripts.store(v, Ordering::SeqCst);
        }
        /// Apps passed to `open_app`, in call order (including failed calls).
        pub fn launched(&self) -> Vec<AppPath> {
            self.launched.lock().clone()
        }
        /// `(dest, source)` pairs passed to `compile_script`.
        pub fn compiled(&self) -> Vec<(PathBuf, String)> {
            self.compiled.lock().clone()
        }
        /// Scripts passed to `run_script`, in call order.
        pub fn scripts_run(&self) -> Vec<PathBuf> {
            self.scripts_run.lock().clone()
        }
        /// Number of `cycle_focus` calls.
        pub fn cycle_count(&self) -> usize {
            self.cycles.load(Ordering::SeqCst)
        }
        /// Number of `active_app` calls.
        pub fn active_queries(&self) -> usize {
            self.active_queries.load(Ordering::SeqCst)
        }
        /// Every call in order, as short `op:arg` strings.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
        /// Forget all recorded calls.
        pub fn clear(&self) {
            self.calls.lock().clear();
            self.launched.lock().clear();
            self.compiled.lock().clear();
            self.scripts_run.lock().clear();
            self.cycles.store(0, Ordering::SeqCst);
            self.active_queries.store(0, Ordering::SeqCst);
        }
        fn note(&self, s: String) {
            self.calls.lock().push(s);
        }
        fn mock_failure(program: &str) -> Error {
            Error::CommandFailed {
                program: program.to_string(),
                code: Some(1),
                stderr: "mock failure".to_string(),
            }
        }
    }

    impl DesktopOps for MockDesktopOps {
        fn open_app(&self, app: &AppPath) -> Result<()> {
            self.note(format!("open:{app}"));
            self.launched.lock().push(app.clone());
            if self.fail_open.load(Ordering::SeqCst) {
                return Err(Self::mock_failure("open"));
            }
            *self.active.lock() = Some(app.clone());
            Ok(())
        }
        fn active_app(&self) -> Result<AppPath> {
            self.active_queries.fetch_add(1, Ordering::SeqCst);
            self.active.lock().clone().ok_or(Error::NoFrontmostApp)
        }
        fn cycle_focus(&self) -> Result<()> {
            self.note("cycle_focus".to_string());
            self.cycles.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn compile_script(&self, source: &str, dest: &Path) -> Result<()> {
            self.note(format!("compile:{}", dest.display()));
            if self.fail_scripts.load(Ordering::SeqCst) {
                return Err(Self::mock_failure("osacompile"));
            }
            self.compiled
                .lock()
                .push((dest.to_path_buf(), source.to_string()));
            Ok(())
        }
        fn run_script(&self, script: &Path) -> Result<()> {
            self.note(format!("run:{}", script.display()));
            self.scripts_run.lock().push(script.to_path_buf());
            if self.fail_scripts.load(Ordering::SeqCst) {
                return Err(Self::mock_failure("osascript"));
            }
            Ok(())
        }
    }

}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockDesktopOps;
