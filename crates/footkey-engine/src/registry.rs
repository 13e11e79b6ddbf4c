use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use tracing::{debug, trace, warn};

use crate::action::{Action, PedalIndex};

/// Edges whose action takes longer than this are logged at `warn`.
pub const SLOW_DISPATCH_MS: u64 = 500;

/// One action per pedal, keyed by the action's own pedal index.
///
/// Registration happens once at startup; the registry is then moved into the
/// dispatcher, which is its only user.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    /// Actions ordered by pedal.
    actions: BTreeMap<PedalIndex, Box<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` under its pedal, returning the action it replaced.
    pub fn register<A: Action + 'static>(&mut self, action: A) -> Option<Box<dyn Action>> {
        self.register_boxed(Box::new(action))
    }

    /// Store an already boxed action under its pedal.
    pub fn register_boxed(&mut self, action: Box<dyn Action>) -> Option<Box<dyn Action>> {
        let pedal = action.pedal();
        let prev = self.actions.insert(pedal, action);
        match &prev {
            Some(old) => debug!(pedal, replaced = ?old, "action_replaced"),
            None => trace!(pedal, "action_registered"),
        }
        prev
    }

    /// Deliver an edge to the action bound to `pedal`, if any.
    pub fn dispatch(&mut self, pedal: PedalIndex, pressed: bool) {
        let Some(action) = self.actions.get_mut(&pedal) else {
            trace!(pedal, pressed, "unmapped_pedal");
            return;
        };
        trace!(pedal, pressed, "dispatch");
        let start = Instant::now();
        action.on_edge(pressed);
        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(SLOW_DISPATCH_MS) {
            warn!(
                pedal,
                pressed,
                elapsed_ms = elapsed.as_millis(),
                "slow_dispatch"
            );
        }
    }

    /// Registered actions ordered by pedal.
    pub fn list_registered(&self) -> impl Iterator<Item = (PedalIndex, &dyn Action)> {
        self.actions.iter().map(|(p, a)| (*p, a.as_ref()))
    }

    /// True when `pedal` has an action.
    pub fn contains(&self, pedal: PedalIndex) -> bool {
        self.actions.contains_key(&pedal)
    }

    /// Number of bound pedals.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug)]
    struct Recorder {
        pedal: PedalIndex,
        tag: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, bool)>>>,
    }

    impl Action for Recorder {
        fn pedal(&self) -> PedalIndex {
            self.pedal
        }
        fn on_edge(&mut self, pressed: bool) {
            self.seen.lock().push((self.tag, pressed));
        }
    }

    fn recorder(
        pedal: PedalIndex,
        tag: &'static str,
        seen: &Arc<Mutex<Vec<(&'static str, bool)>>>,
    ) -> Recorder {
        Recorder {
            pedal,
            tag,
            seen: seen.clone(),
        }
    }

    #[test]
    fn unmapped_pedal_is_ignored() {
        let mut reg = ActionRegistry::new();
        reg.dispatch(7, true);
        reg.dispatch(7, false);
        assert!(reg.is_empty());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut reg = ActionRegistry::new();
        assert!(reg.register(recorder(0, "first", &seen)).is_none());
        let old = reg.register(recorder(0, "second", &seen));
        assert_eq!(old.map(|a| a.pedal()), Some(0));
        assert_eq!(reg.len(), 1);

        reg.dispatch(0, true);
        assert_eq!(*seen.lock(), vec![("second", true)]);
    }

    #[test]
    fn dispatch_reaches_only_the_bound_action() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut reg = ActionRegistry::new();
        reg.register(recorder(0, "a", &seen));
        reg.register(recorder(2, "c", &seen));
        reg.dispatch(2, true);
        reg.dispatch(1, true);
        reg.dispatch(2, false);
        assert_eq!(*seen.lock(), vec![("c", true), ("c", false)]);
        assert!(reg.contains(0));
        assert!(!reg.contains(1));
    }

    #[test]
    fn listing_is_ordered_by_pedal() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut reg = ActionRegistry::new();
        reg.register(recorder(2, "c", &seen));
        reg.register(recorder(0, "a", &seen));
        reg.register(recorder(1, "b", &seen));
        let pedals: Vec<PedalIndex> = reg.list_registered().map(|(p, _)| p).collect();
        assert_eq!(pedals, vec![0, 1, 2]);
    }
}
