//! Drive pedal edges from a source into the action registry.

use std::{convert::Infallible, fmt};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{action::EdgeEvent, registry::ActionRegistry};

/// Blocking producer of pedal edges.
pub trait EdgeSource {
    /// Failure that ends the source early.
    type Error: fmt::Display;

    /// Deliver edges to `sink` until `stop` is cancelled or the source fails.
    ///
    /// Runs on the calling thread; `sink` is invoked synchronously for each
    /// edge, so a slow action delays the next edge.
    fn run(
        &mut self,
        stop: &CancellationToken,
        sink: &mut dyn FnMut(EdgeEvent),
    ) -> Result<(), Self::Error>;
}

/// Owns an [`ActionRegistry`] and feeds it from an [`EdgeSource`].
#[derive(Debug)]
pub struct Dispatcher<S> {
    /// Edge producer.
    source: S,
    /// Bound actions.
    registry: ActionRegistry,
}

impl<S: EdgeSource> Dispatcher<S> {
    /// Take ownership of a fully populated registry.
    pub fn new(source: S, registry: ActionRegistry) -> Self {
        Self { source, registry }
    }

    /// Registered actions.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Block dispatching edges until `stop` fires or the source fails.
    ///
    /// Action failures never end the loop; only source errors are returned.
    pub fn run(&mut self, stop: &CancellationToken) -> Result<(), S::Error> {
        info!(pedals = self.registry.len(), "dispatch_start");
        let registry = &mut self.registry;
        let mut edges = 0usize;
        let res = self.source.run(stop, &mut |ev| {
            edges += 1;
            registry.dispatch(ev.pedal, ev.pressed);
        });
        debug!(edges, ok = res.is_ok(), "dispatch_stop");
        res
    }

    /// Give back the source and registry.
    pub fn into_parts(self) -> (S, ActionRegistry) {
        (self.source, self.registry)
    }
}

/// Replays a fixed list of edges, then returns.
///
/// Useful for driving a registry without hardware.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    /// Edges still to deliver.
    events: Vec<EdgeEvent>,
    /// Number already delivered.
    delivered: usize,
}

impl ScriptedSource {
    /// Source that will replay `events` in order.
    pub fn new(events: impl IntoIterator<Item = EdgeEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            delivered: 0,
        }
    }

    /// Number of edges delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl EdgeSource for ScriptedSource {
    type Error = Infallible;

    fn run(
        &mut self,
        stop: &CancellationToken,
        sink: &mut dyn FnMut(EdgeEvent),
    ) -> Result<(), Self::Error> {
        while let Some(ev) = self.events.get(self.delivered).copied() {
            if stop.is_cancelled() {
                break;
            }
            self.delivered += 1;
            sink(ev);
        }
        Ok(())
    }
}
