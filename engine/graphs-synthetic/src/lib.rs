//! Synthetic implicit graphs for the path search engine
//!
//! Two small generators with known structure, used by tests, benchmarks and
//! the runner:
//!
//! - [`UniformTree`]: every inner node has the same branching factor, every
//!   leaf at the configured depth is a goal and carries a deterministic
//!   pseudo-random cost
//! - [`SubsetSum`]: decide item by item whether to take it; different choices
//!   reach the same `(index, sum)` state, so the graph is a DAG. The cost of
//!   a complete path is the gap to the target sum
//!
//! # Usage
//!
//! ```rust
//! use graphs_synthetic::UniformTree;
//! use search_core::GraphGenerator;
//!
//! let tree = UniformTree::new(3, 2);
//! assert_eq!(tree.leaf_count(), 9);
//! assert_eq!(tree.successors(&tree.root()).unwrap().len(), 3);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search_core::{GenerationError, GraphGenerator, SearchPath, Successor};

/// FNV-1a over a sequence of words
fn fingerprint(words: impl IntoIterator<Item = u64>) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for word in words {
        for byte in word.to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}

// ============================================================================
// Uniform tree
// ============================================================================

/// Complete tree with `branching` children per inner node.
///
/// States are the action sequences leading to them, so the root is the empty
/// vector and every state has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformTree {
    branching: u32,
    depth: usize,
    cost_seed: u64,
}

impl UniformTree {
    pub fn new(branching: u32, depth: usize) -> Self {
        Self {
            branching,
            depth,
            cost_seed: 0,
        }
    }

    /// Use a different cost landscape over the same tree
    pub fn with_cost_seed(mut self, seed: u64) -> Self {
        self.cost_seed = seed;
        self
    }

    pub fn branching(&self) -> u32 {
        self.branching
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of goal leaves, saturating at `u64::MAX`
    pub fn leaf_count(&self) -> u64 {
        (0..self.depth).fold(1u64, |acc, _| acc.saturating_mul(u64::from(self.branching)))
    }

    /// Number of states in the whole tree, saturating at `u64::MAX`
    pub fn node_count(&self) -> u64 {
        let mut level = 1u64;
        let mut total = 1u64;
        for _ in 0..self.depth {
            level = level.saturating_mul(u64::from(self.branching));
            total = total.saturating_add(level);
        }
        total
    }

    /// Cost in `[0, 1)` of the path's head, fixed by the state and the seed.
    pub fn cost(&self, path: &SearchPath<Vec<u32>, u32>) -> f64 {
        self.state_cost(path.head())
    }

    pub fn state_cost(&self, state: &[u32]) -> f64 {
        let seed = fingerprint(
            std::iter::once(self.cost_seed).chain(state.iter().map(|c| u64::from(*c))),
        );
        ChaCha20Rng::seed_from_u64(seed).gen::<f64>()
    }

    /// The cheapest leaf, found by enumerating the whole tree.
    ///
    /// Only meant for small trees in tests.
    pub fn cheapest_leaf(&self) -> Option<(Vec<u32>, f64)> {
        let mut best: Option<(Vec<u32>, f64)> = None;
        let mut stack = vec![Vec::new()];
        while let Some(state) = stack.pop() {
            if state.len() == self.depth {
                let cost = self.state_cost(&state);
                if best.as_ref().map_or(true, |(_, c)| cost < *c) {
                    best = Some((state, cost));
                }
                continue;
            }
            for choice in 0..self.branching {
                let mut next = state.clone();
                next.push(choice);
                stack.push(next);
            }
        }
        best
    }

    fn child(state: &[u32], choice: u32) -> Vec<u32> {
        let mut next = Vec::with_capacity(state.len() + 1);
        next.extend_from_slice(state);
        next.push(choice);
        next
    }
}

impl GraphGenerator for UniformTree {
    type State = Vec<u32>;
    type Action = u32;

    fn root(&self) -> Vec<u32> {
        Vec::new()
    }

    fn successors(
        &self,
        state: &Vec<u32>,
    ) -> Result<Vec<Successor<Vec<u32>, u32>>, GenerationError> {
        if state.len() >= self.depth {
            return Ok(Vec::new());
        }
        Ok((0..self.branching)
            .map(|choice| Successor::new(choice, Self::child(state, choice)))
            .collect())
    }

    fn is_goal(&self, path: &SearchPath<Vec<u32>, u32>) -> bool {
        path.head().len() == self.depth
    }

    /// Draws one child without listing its siblings.
    fn random_successor(
        &self,
        state: &Vec<u32>,
        rng: &mut ChaCha20Rng,
    ) -> Result<Successor<Vec<u32>, u32>, GenerationError> {
        if state.len() >= self.depth || self.branching == 0 {
            return Err(GenerationError::NoSuccessor);
        }
        let choice = rng.gen_range(0..self.branching);
        Ok(Successor::new(choice, Self::child(state, choice)))
    }
}

// ============================================================================
// Subset sum
// ============================================================================

/// Decision taken for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    Take,
    Skip,
}

/// Items decided so far and the weight taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SubsetState {
    pub index: usize,
    pub sum: u64,
}

/// Pick a subset of `weights` whose sum gets as close to `target` as possible
/// without exceeding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSum {
    weights: Vec<u64>,
    target: u64,
}

impl SubsetSum {
    pub fn new(weights: Vec<u64>, target: u64) -> Self {
        Self { weights, target }
    }

    /// `items` weights drawn from `1..=max_weight`, target half their total.
    pub fn random(items: usize, max_weight: u64, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let weights: Vec<u64> = (0..items)
            .map(|_| rng.gen_range(1..=max_weight.max(1)))
            .collect();
        let target = weights.iter().sum::<u64>() / 2;
        Self::new(weights, target)
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Distance between the target and the weight taken on `path`.
    pub fn gap(&self, path: &SearchPath<SubsetState, Choice>) -> f64 {
        self.target.saturating_sub(path.head().sum) as f64
    }

    /// Items taken along `path`, by index
    pub fn taken(path: &SearchPath<SubsetState, Choice>) -> Vec<usize> {
        path.steps()
            .filter(|(_, choice)| **choice == Choice::Take)
            .map(|(state, _)| state.index)
            .collect()
    }
}

impl GraphGenerator for SubsetSum {
    type State = SubsetState;
    type Action = Choice;

    fn root(&self) -> SubsetState {
        SubsetState::default()
    }

    fn successors(
        &self,
        state: &SubsetState,
    ) -> Result<Vec<Successor<SubsetState, Choice>>, GenerationError> {
        let Some(&weight) = self.weights.get(state.index) else {
            return Ok(Vec::new());
        };
        let mut successors = Vec::with_capacity(2);
        if state.sum + weight <= self.target {
            successors.push(Successor::new(
                Choice::Take,
                SubsetState {
                    index: state.index + 1,
                    sum: state.sum + weight,
                },
            ));
        }
        successors.push(Successor::new(
            Choice::Skip,
            SubsetState {
                index: state.index + 1,
                sum: state.sum,
            },
        ));
        Ok(successors)
    }

    fn is_goal(&self, path: &SearchPath<SubsetState, Choice>) -> bool {
        path.head().index == self.weights.len()
    }
}
