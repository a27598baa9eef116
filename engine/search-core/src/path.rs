//! Paths through a search graph

use std::fmt;

/// Error type for path construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Path must contain at least one node")]
    Empty,
    #[error("Path with {nodes} nodes needs {expected} arcs, got {arcs}")]
    ArcCount {
        nodes: usize,
        arcs: usize,
        expected: usize,
    },
    #[error("Root path has no parent path")]
    NoParent,
}

/// Non-empty sequence of states joined by the actions between them
///
/// `nodes[i + 1]` is reached from `nodes[i]` through `arcs[i]`. Paths are
/// compared and hashed by value, which makes them usable as score-cache keys.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SearchPath<N, A> {
    nodes: Vec<N>,
    arcs: Vec<A>,
}

impl<N, A> SearchPath<N, A> {
    /// Build a path from its nodes and the arcs connecting them
    pub fn new(nodes: Vec<N>, arcs: Vec<A>) -> Result<Self, PathError> {
        if nodes.is_empty() {
            return Err(PathError::Empty);
        }
        if arcs.len() + 1 != nodes.len() {
            return Err(PathError::ArcCount {
                nodes: nodes.len(),
                arcs: arcs.len(),
                expected: nodes.len() - 1,
            });
        }
        Ok(Self { nodes, arcs })
    }

    /// Path consisting only of `root`
    pub fn root_only(root: N) -> Self {
        Self {
            nodes: vec![root],
            arcs: Vec::new(),
        }
    }

    pub fn root(&self) -> &N {
        &self.nodes[0]
    }

    pub fn head(&self) -> &N {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn arcs(&self) -> &[A] {
        &self.arcs
    }

    /// Number of nodes (never zero)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; paths hold at least the root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of arcs
    pub fn depth(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_root_only(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Append one arc and its target node
    pub fn push(&mut self, action: A, node: N) {
        self.arcs.push(action);
        self.nodes.push(node);
    }

    /// Pairs each non-head node with the action taken out of it
    pub fn steps(&self) -> impl Iterator<Item = (&N, &A)> + '_ {
        self.nodes.iter().zip(self.arcs.iter())
    }

    pub fn contains(&self, node: &N) -> bool
    where
        N: PartialEq,
    {
        self.nodes.contains(node)
    }

    /// Index of `node` on the path, if present
    pub fn position(&self, node: &N) -> Option<usize>
    where
        N: PartialEq,
    {
        self.nodes.iter().position(|n| n == node)
    }
}

impl<N: Clone, A: Clone> SearchPath<N, A> {
    /// Copy of this path extended by one arc
    pub fn extended(&self, action: A, node: N) -> Self {
        let mut path = self.clone();
        path.push(action, node);
        path
    }

    /// First `len` nodes of the path (clamped to `1..=self.len()`)
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.clamp(1, self.nodes.len());
        Self {
            nodes: self.nodes[..len].to_vec(),
            arcs: self.arcs[..len - 1].to_vec(),
        }
    }

    /// The path without its head
    pub fn path_to_parent_of_head(&self) -> Result<Self, PathError> {
        if self.is_root_only() {
            return Err(PathError::NoParent);
        }
        Ok(self.prefix(self.nodes.len() - 1))
    }
}

impl<N: fmt::Debug, A: fmt::Debug> fmt::Debug for SearchPath<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.nodes[0])?;
        for (action, node) in self.arcs.iter().zip(self.nodes.iter().skip(1)) {
            write!(f, " -{action:?}-> {node:?}")?;
        }
        Ok(())
    }
}

/// A goal path together with the score it was evaluated to
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedPath<N, A> {
    pub path: SearchPath<N, A>,
    pub score: f64,
}

impl<N, A> EvaluatedPath<N, A> {
    pub fn new(path: SearchPath<N, A>, score: f64) -> Self {
        Self { path, score }
    }

    pub fn head(&self) -> &N {
        self.path.head()
    }
}
