//! Visualization events emitted by a running search
//!
//! Sinks are fire-and-forget observers. A search behaves the same with or
//! without one attached.

use std::fmt::Debug;
use std::sync::Mutex;
use tracing::trace;

/// Display state a node can be switched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Node lies on the playout currently being built
    Rollout,
    /// Evaluating a path ending in this node failed
    EvaluationFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent<N> {
    GraphInitialized { root: N },
    NodeAdded { parent: N, child: N },
    NodeStateSwitch { node: N, state: NodeState },
    RolloutObserved { nodes: Vec<N>, score: f64 },
}

impl<N> SearchEvent<N> {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            SearchEvent::GraphInitialized { .. } => "graph_initialized",
            SearchEvent::NodeAdded { .. } => "node_added",
            SearchEvent::NodeStateSwitch { .. } => "node_state_switch",
            SearchEvent::RolloutObserved { .. } => "rollout_observed",
        }
    }
}

/// Receiver of search events
///
/// `notify` must not block for long; the search calls it inline.
pub trait EventSink<N>: Send + Sync {
    fn notify(&self, event: SearchEvent<N>);
}

/// Keeps every event in memory, mostly for tests and reports
#[derive(Debug)]
pub struct RecordingSink<N> {
    events: Mutex<Vec<SearchEvent<N>>>,
}

impl<N> Default for RecordingSink<N> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl<N: Clone> RecordingSink<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<SearchEvent<N>> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N: Send> EventSink<N> for RecordingSink<N> {
    fn notify(&self, event: SearchEvent<N>) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Forwards events to `tracing` at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl<N: Debug> EventSink<N> for TracingSink {
    fn notify(&self, event: SearchEvent<N>) {
        match &event {
            SearchEvent::GraphInitialized { root } => {
                trace!(event = event.kind(), root = ?root, "search event");
            }
            SearchEvent::NodeAdded { parent, child } => {
                trace!(event = event.kind(), parent = ?parent, child = ?child, "search event");
            }
            SearchEvent::NodeStateSwitch { node, state } => {
                trace!(event = event.kind(), node = ?node, state = ?state, "search event");
            }
            SearchEvent::RolloutObserved { nodes, score } => {
                trace!(event = event.kind(), length = nodes.len(), score, "search event");
            }
        }
    }
}
