//! Explored graph with arena allocation.
//!
//! The graph only grows. Nodes are stored in a contiguous Vec, referenced by
//! NodeId indices, and found by value through a state index. Parents are
//! recovered from the predecessor lists rather than stored as live references.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use search_core::{SearchPath, Successor};
use thiserror::Error;

use crate::node::{GraphNode, NodeId};

/// Consistency violations in the explored graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Duplicate action {action} among successors of {state}")]
    DuplicateAction { state: String, action: String },

    #[error("Node {state} has already been expanded")]
    AlreadyExpanded { state: String },

    #[error("Path is not contained in the explored graph: {path}")]
    PathNotInGraph { path: String },
}

/// Single-rooted directed graph over the visited states.
#[derive(Debug)]
pub struct ExploredGraph<N, A> {
    /// Arena storing all nodes, root at index 0
    nodes: Vec<GraphNode<N, A>>,

    /// State -> node lookup
    index: HashMap<N, NodeId>,

    /// Number of nodes whose successors are not attached yet
    unexpanded: usize,
}

impl<N, A> ExploredGraph<N, A>
where
    N: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Create a graph holding only the (unexpanded) root.
    pub fn new(root: N) -> Self {
        let mut index = HashMap::new();
        index.insert(root.clone(), NodeId(0));
        Self {
            nodes: vec![GraphNode::new(root)],
            index,
            unexpanded: 1,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &GraphNode<N, A> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut GraphNode<N, A> {
        &mut self.nodes[id.index()]
    }

    /// Checked lookup for ids coming from outside the graph
    pub fn try_get(&self, id: NodeId) -> Result<&GraphNode<N, A>, GraphError> {
        self.nodes.get(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    #[inline]
    pub fn state(&self, id: NodeId) -> &N {
        &self.get(id).state
    }

    pub fn id_of(&self, state: &N) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    pub fn contains(&self, state: &N) -> bool {
        self.index.contains_key(state)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true; the root is inserted at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn unexpanded_count(&self) -> usize {
        self.unexpanded
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.get(id).expanded
    }

    pub fn is_visited(&self, id: NodeId) -> bool {
        self.get(id).visited
    }

    pub fn is_fully_explored(&self, id: NodeId) -> bool {
        self.get(id).fully_explored
    }

    pub fn successors(&self, id: NodeId) -> &[(A, NodeId)] {
        &self.get(id).successors
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).predecessors
    }

    /// Whether every attached child has been picked by the default policy.
    /// Vacuously true for dead ends.
    pub fn all_children_visited(&self, id: NodeId) -> bool {
        self.get(id)
            .successors
            .iter()
            .all(|(_, child)| self.get(*child).visited)
    }

    /// Allocate a node for `state`, or return the existing one.
    /// Returns the id and whether the node is new.
    fn intern(&mut self, state: N) -> (NodeId, bool) {
        if let Some(id) = self.index.get(&state) {
            return (*id, false);
        }
        let id = NodeId(self.nodes.len() as u32);
        self.index.insert(state.clone(), id);
        self.nodes.push(GraphNode::new(state));
        self.unexpanded += 1;
        (id, true)
    }

    fn link(&mut self, parent: NodeId, action: A, child: NodeId) {
        self.get_mut(parent).successors.push((action, child));
        let preds = &mut self.get_mut(child).predecessors;
        if !preds.contains(&parent) {
            preds.push(parent);
        }
    }

    /// Attach the full successor set of an unexpanded node.
    ///
    /// Action labels are validated before anything is attached, so a
    /// failure leaves the graph untouched. Returns the ids of the children in
    /// generator order together with a flag telling whether each one is new.
    pub fn attach_successors(
        &mut self,
        parent: NodeId,
        successors: Vec<Successor<N, A>>,
    ) -> Result<Vec<(NodeId, bool)>, GraphError> {
        let node = self.try_get(parent)?;
        if node.expanded {
            return Err(GraphError::AlreadyExpanded {
                state: format!("{:?}", node.state),
            });
        }

        let mut seen = std::collections::HashSet::with_capacity(successors.len());
        for succ in &successors {
            if !seen.insert(&succ.action) {
                return Err(GraphError::DuplicateAction {
                    state: format!("{:?}", node.state),
                    action: format!("{:?}", succ.action),
                });
            }
        }

        let mut children = Vec::with_capacity(successors.len());
        for succ in successors {
            let (child, is_new) = self.intern(succ.to);
            self.link(parent, succ.action, child);
            children.push((child, is_new));
        }
        self.mark_expanded(parent);
        Ok(children)
    }

    /// Add a single arc, creating the target node if needed.
    ///
    /// Re-adding an existing arc is a no-op; reusing its action for a
    /// different target is a `DuplicateAction` error.
    pub fn add_arc(&mut self, parent: NodeId, action: A, to: N) -> Result<NodeId, GraphError> {
        let node = self.try_get(parent)?;
        if let Some(existing) = node.child_by_action(&action) {
            if self.get(existing).state == to {
                return Ok(existing);
            }
            return Err(GraphError::DuplicateAction {
                state: format!("{:?}", node.state),
                action: format!("{action:?}"),
            });
        }
        let (child, _) = self.intern(to);
        self.link(parent, action, child);
        Ok(child)
    }

    /// Check that every arc of `path` could be added with [`Self::add_arc`].
    ///
    /// An arc conflicts when its source already has, or earlier on the path
    /// gets, an arc with the same action to a different target. The graph is
    /// not changed.
    pub fn check_arcs(&self, path: &SearchPath<N, A>) -> Result<(), GraphError> {
        let mut planned: HashMap<(&N, &A), &N> = HashMap::new();
        for (pair, action) in path.nodes().windows(2).zip(path.arcs()) {
            let (from, to) = (&pair[0], &pair[1]);
            let existing = self
                .id_of(from)
                .and_then(|id| self.get(id).child_by_action(action))
                .map(|child| self.state(child));
            match existing.or_else(|| planned.get(&(from, action)).copied()) {
                Some(target) if target != to => {
                    return Err(GraphError::DuplicateAction {
                        state: format!("{from:?}"),
                        action: format!("{action:?}"),
                    });
                }
                Some(_) => {}
                None => {
                    planned.insert((from, action), to);
                }
            }
        }
        Ok(())
    }

    /// Take a node out of the unexpanded set.
    pub fn mark_expanded(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        if !node.expanded {
            node.expanded = true;
            self.unexpanded -= 1;
        }
    }

    pub fn mark_visited(&mut self, id: NodeId) {
        self.get_mut(id).visited = true;
    }

    /// Mark a node fully explored and propagate upwards.
    ///
    /// A predecessor becomes fully explored once it is expanded and all of its
    /// children are. Every predecessor is considered, so shared sub-graphs
    /// propagate along all incoming arcs. Returns the nodes newly marked, in
    /// marking order.
    pub fn mark_fully_explored(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut marked = Vec::new();
        if self.get(id).fully_explored {
            return marked;
        }
        self.get_mut(id).fully_explored = true;
        marked.push(id);

        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            let preds = self.get(current).predecessors.clone();
            for pred in preds {
                let node = self.get(pred);
                if node.fully_explored || !node.expanded {
                    continue;
                }
                let exhausted = node
                    .successors
                    .iter()
                    .all(|(_, child)| self.get(*child).fully_explored);
                if exhausted {
                    self.get_mut(pred).fully_explored = true;
                    marked.push(pred);
                    frontier.push(pred);
                }
            }
        }
        marked
    }

    /// Resolve a path into node ids, checking every arc and its action label.
    pub fn path_ids(&self, path: &SearchPath<N, A>) -> Result<Vec<NodeId>, GraphError> {
        let not_in_graph = || GraphError::PathNotInGraph {
            path: format!("{path:?}"),
        };
        let mut current = self.id_of(path.root()).ok_or_else(not_in_graph)?;
        if current != self.root() {
            return Err(not_in_graph());
        }
        let mut ids = Vec::with_capacity(path.len());
        ids.push(current);
        for (action, next) in path.arcs().iter().zip(path.nodes().iter().skip(1)) {
            let child = self
                .get(current)
                .child_by_action(action)
                .ok_or_else(not_in_graph)?;
            if self.state(child) != next {
                return Err(not_in_graph());
            }
            ids.push(child);
            current = child;
        }
        Ok(ids)
    }

    pub fn contains_path(&self, path: &SearchPath<N, A>) -> bool {
        self.path_ids(path).is_ok()
    }

    /// Length of the longest prefix of `path` that is attached to the graph
    ///
    /// Zero if the path does not even start at the root.
    pub fn attached_prefix_len(&self, path: &SearchPath<N, A>) -> usize {
        let Some(mut current) = self.id_of(path.root()).filter(|id| *id == self.root()) else {
            return 0;
        };
        let mut len = 1;
        for (action, next) in path.arcs().iter().zip(path.nodes().iter().skip(1)) {
            match self.get(current).child_by_action(action) {
                Some(child) if self.state(child) == next => {
                    current = child;
                    len += 1;
                }
                _ => break,
            }
        }
        len
    }

    /// Get statistics about the graph for debugging.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_nodes: self.nodes.len(),
            total_arcs: self.nodes.iter().map(|n| n.successors.len()).sum(),
            unexpanded: self.unexpanded,
            fully_explored: self.nodes.iter().filter(|n| n.fully_explored).count(),
            dead_ends: self.nodes.iter().filter(|n| n.is_dead_end()).count(),
        }
    }
}

/// Statistics about an explored graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_arcs: usize,
    pub unexpanded: usize,
    pub fully_explored: usize,
    pub dead_ends: usize,
}
