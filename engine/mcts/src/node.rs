//! Explored-graph node representation.
//!
//! Each node holds one generator state plus the bookkeeping the search needs:
//! outgoing arcs (once expanded), incoming arcs, and the visited /
//! fully-explored flags.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the explored graph.
#[derive(Debug, Clone)]
pub struct GraphNode<N, A> {
    /// Generator state at this node
    pub state: N,

    /// Outgoing arcs: (action, child) pairs in generator order.
    /// Empty until the node is expanded (and for dead ends afterwards).
    pub successors: Vec<(A, NodeId)>,

    /// Nodes with an arc into this one. Empty only for the root.
    pub predecessors: Vec<NodeId>,

    /// Whether the successor set has been generated and attached
    pub expanded: bool,

    /// Whether the default policy has picked this node at least once
    pub visited: bool,

    /// Whether every path below this node is known to be exhausted
    pub fully_explored: bool,
}

impl<N, A> GraphNode<N, A> {
    pub fn new(state: N) -> Self {
        Self {
            state,
            successors: Vec::new(),
            predecessors: Vec::new(),
            expanded: false,
            visited: false,
            fully_explored: false,
        }
    }

    /// Expanded with no successors
    #[inline]
    pub fn is_dead_end(&self) -> bool {
        self.expanded && self.successors.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Child reached through `action`, if attached
    pub fn child_by_action(&self, action: &A) -> Option<NodeId>
    where
        A: PartialEq,
    {
        self.successors
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }
}
