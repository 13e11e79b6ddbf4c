//! Restartable cursor over a fixed app list plus an optional dynamic tail.

use mac_desktop::AppPath;

/// Infinite round-robin over `fixed ++ tail`.
///
/// The tail is fetched lazily each time the cursor first steps past the fixed
/// list and is kept for the rest of that traversal, so changes to the source
/// only show up on the next lap.
#[derive(Clone, Debug)]
pub struct AppCycle {
    /// Configured apps, always visited first.
    fixed: Vec<AppPath>,
    /// Tail snapshot for the current traversal, if already taken.
    tail: Option<Vec<AppPath>>,
    /// Position within `fixed ++ tail`.
    pos: usize,
}

impl AppCycle {
    /// Create a cycle over `fixed`, starting at its first entry.
    pub fn new(fixed: Vec<AppPath>) -> Self {
        Self {
            fixed,
            tail: None,
            pos: 0,
        }
    }

    /// The configured list.
    pub fn fixed(&self) -> &[AppPath] {
        &self.fixed
    }

    /// Next app, with no dynamic tail.
    pub fn next_fixed(&mut self) -> Option<AppPath> {
        self.next_with(Vec::new)
    }

    /// Next app; `tail` is called at most twice when a new traversal needs it.
    ///
    /// Returns `None` only when a whole traversal is empty.
    pub fn next_with<F>(&mut self, mut tail: F) -> Option<AppPath>
    where
        F: FnMut() -> Vec<AppPath>,
    {
        // One wrap at most: an empty lap after wrapping means nothing to yield.
        for _ in 0..2 {
            if let Some(app) = self.fixed.get(self.pos) {
                self.pos += 1;
                return Some(app.clone());
            }
            let snapshot = self.tail.get_or_insert_with(&mut tail);
            if let Some(app) = snapshot.get(self.pos - self.fixed.len()) {
                let app = app.clone();
                self.pos += 1;
                return Some(app);
            }
            self.pos = 0;
            self.tail = None;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(name: &str) -> AppPath {
        AppPath::resolve_with_home(name, None)
    }

    fn take(cycle: &mut AppCycle, n: usize, tail: &[AppPath]) -> Vec<String> {
        (0..n)
            .filter_map(|_| cycle.next_with(|| tail.to_vec()))
            .map(|a| a.bundle_name())
            .collect()
    }

    #[test]
    fn fixed_list_repeats_in_order() {
        let mut c = AppCycle::new(vec![app("A.app"), app("B.app"), app("C.app")]);
        let seen: Vec<String> = (0..6)
            .filter_map(|_| c.next_fixed())
            .map(|a| a.bundle_name())
            .collect();
        assert_eq!(seen, ["A.app", "B.app", "C.app", "A.app", "B.app", "C.app"]);
    }

    #[test]
    fn tail_follows_fixed_list() {
        let mut c = AppCycle::new(vec![app("X.app"), app("Y.app")]);
        let tail = vec![app("Z.app")];
        assert_eq!(
            take(&mut c, 6, &tail),
            ["X.app", "Y.app", "Z.app", "X.app", "Y.app", "Z.app"]
        );
    }

    #[test]
    fn tail_snapshot_is_taken_once_per_lap() {
        let mut c = AppCycle::new(vec![app("X.app")]);
        let mut calls = 0;
        let mut source = vec![app("P.app"), app("Q.app")];
        let next = |c: &mut AppCycle, source: &Vec<AppPath>, calls: &mut usize| {
            c.next_with(|| {
                *calls += 1;
                source.clone()
            })
            .map(|a| a.bundle_name())
        };
        assert_eq!(next(&mut c, &source, &mut calls).as_deref(), Some("X.app"));
        assert_eq!(next(&mut c, &source, &mut calls).as_deref(), Some("P.app"));
        // Source changes mid-lap; the current lap keeps its snapshot.
        source = vec![app("R.app")];
        assert_eq!(next(&mut c, &source, &mut calls).as_deref(), Some("Q.app"));
        assert_eq!(calls, 1);
        assert_eq!(next(&mut c, &source, &mut calls).as_deref(), Some("X.app"));
        assert_eq!(next(&mut c, &source, &mut calls).as_deref(), Some("R.app"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn empty_cycle_yields_none() {
        let mut c = AppCycle::new(Vec::new());
        assert_eq!(c.next_fixed(), None);
        assert_eq!(c.next_with(Vec::new), None);
    }

    #[test]
    fn empty_fixed_list_uses_tail_only() {
        let mut c = AppCycle::new(Vec::new());
        let tail = vec![app("Z.app")];
        assert_eq!(take(&mut c, 3, &tail), ["Z.app", "Z.app", "Z.app"]);
    }
}
