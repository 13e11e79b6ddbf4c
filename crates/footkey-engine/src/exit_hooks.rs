//! Cleanup callbacks run once at controlled shutdown.
//!
//! Modifiers register a key release here so that no key stays logically held
//! after the process stops. A forced kill skips them.

use std::{fmt, mem, sync::Arc};

use parking_lot::Mutex;
use tracing::{debug, trace};

/// A registered cleanup callback.
type Hook = Box<dyn FnOnce() + Send>;

/// Process-lifetime list of cleanup callbacks.
///
/// Clones share the same list. Each hook runs at most once: [`ExitHooks::run`]
/// drains the list, so later calls only see hooks registered in between.
#[derive(Clone, Default)]
pub struct ExitHooks {
    /// Pending hooks in registration order.
    hooks: Arc<Mutex<Vec<(String, Hook)>>>,
}

impl ExitHooks {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `hook` under a diagnostic `label`.
    pub fn register<F>(&self, label: impl Into<String>, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let label = label.into();
        trace!(hook = %label, "exit_hook_registered");
        self.hooks.lock().push((label, Box::new(hook)));
    }

    /// Number of pending hooks.
    pub fn len(&self) -> usize {
        self.hooks.lock().len()
    }

    /// True when no hooks are pending.
    pub fn is_empty(&self) -> bool {
        self.hooks.lock().is_empty()
    }

    /// Run and remove every pending hook in registration order.
    ///
    /// Returns the number of hooks run.
    pub fn run(&self) -> usize {
        // Drain first so a hook that registers another does not deadlock.
        let hooks = mem::take(&mut *self.hooks.lock());
        let n = hooks.len();
        for (label, hook) in hooks {
            debug!(hook = %label, "exit_hook_run");
            hook();
        }
        n
    }

    /// Guard that runs the hooks when dropped.
    pub fn guard(&self) -> ExitGuard {
        ExitGuard {
            hooks: self.clone(),
        }
    }
}

impl fmt::Debug for ExitHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.hooks.lock().iter().map(|(l, _)| l.clone()).collect();
        f.debug_struct("ExitHooks").field("pending", &labels).finish()
    }
}

/// Runs [`ExitHooks::run`] on drop, including during unwinding.
#[derive(Debug)]
#[must_use = "hooks run when the guard is dropped"]
pub struct ExitGuard {
    /// Shared hook list.
    hooks: ExitHooks,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let n = self.hooks.run();
        if n > 0 {
            debug!(count = n, "exit_hooks_done");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        panic::{self, AssertUnwindSafe},
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn hooks_run_once_in_order() {
        let hooks = ExitHooks::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let o = order.clone();
            hooks.register(format!("h{i}"), move || o.lock().push(i));
        }
        assert_eq!(hooks.len(), 3);
        assert_eq!(hooks.run(), 3);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(hooks.run(), 0);
        assert_eq!(order.lock().len(), 3);
    }

    #[test]
    fn guard_runs_on_drop_and_clones_share_the_list() {
        let hooks = ExitHooks::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        hooks.clone().register("inc", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        {
            let _guard = hooks.guard();
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(hooks.is_empty());
    }

    #[test]
    fn guard_runs_during_unwind() {
        let hooks = ExitHooks::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        hooks.register("inc", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let h = hooks.clone();
        let res = panic::catch_unwind(AssertUnwindSafe(move || {
            let _guard = h.guard();
            panic!("boom");
        }));
        assert!(res.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hook_may_register_another() {
        let hooks = ExitHooks::new();
        let h = hooks.clone();
        hooks.register("outer", move || h.register("inner", || {}));
        assert_eq!(hooks.run(), 1);
        assert_eq!(hooks.len(), 1);
    }
}
