//! Graph generator contract for implicit search graphs
//!
//! A generator describes a (possibly unbounded) directed graph without ever
//! materializing it: it hands out the root, the successors of any state and a
//! goal test over paths. Search algorithms own whatever part of the graph they
//! decide to remember.

use crate::path::SearchPath;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use std::fmt::Debug;
use std::hash::Hash;

/// One outgoing arc of a state: the action label and the state it leads to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Successor<N, A> {
    pub action: A,
    pub to: N,
}

impl<N, A> Successor<N, A> {
    pub fn new(action: A, to: N) -> Self {
        Self { action, to }
    }
}

/// Error type for successor generation
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Successor generation failed: {0}")]
    Failed(String),
    #[error("State has no successors")]
    NoSuccessor,
    #[error("Successor generation was interrupted")]
    Interrupted,
}

/// Main trait for implicit graphs
///
/// # Type Parameters
///
/// * `State` - A node of the graph. Compared and hashed by value, so two
///   equal states are the same node. Keep it cheap to clone (wrap large
///   payloads in `Arc`).
/// * `Action` - Arc label. Labels must be unique among the outgoing arcs of
///   one state.
///
/// # Example
///
/// ```rust
/// use search_core::{GenerationError, GraphGenerator, SearchPath, Successor};
///
/// /// Binary strings of length 3.
/// #[derive(Debug)]
/// struct Bits;
///
/// impl GraphGenerator for Bits {
///     type State = Vec<bool>;
///     type Action = bool;
///
///     fn root(&self) -> Self::State {
///         Vec::new()
///     }
///
///     fn successors(
///         &self,
///         state: &Self::State,
///     ) -> Result<Vec<Successor<Self::State, Self::Action>>, GenerationError> {
///         if state.len() == 3 {
///             return Ok(Vec::new());
///         }
///         Ok([false, true]
///             .into_iter()
///             .map(|bit| {
///                 let mut next = state.clone();
///                 next.push(bit);
///                 Successor::new(bit, next)
///             })
///             .collect())
///     }
///
///     fn is_goal(&self, path: &SearchPath<Self::State, Self::Action>) -> bool {
///         path.head().len() == 3
///     }
/// }
///
/// let bits = Bits;
/// assert_eq!(bits.successors(&bits.root()).unwrap().len(), 2);
/// ```
pub trait GraphGenerator {
    /// Graph node type
    type State: Clone + Eq + Hash + Debug;

    /// Arc label type
    type Action: Clone + Eq + Hash + Debug;

    /// The single root of the graph
    fn root(&self) -> Self::State;

    /// All successors of a state, in a stable order
    ///
    /// Must be side-effect free from the caller's point of view: asking twice
    /// for the same state yields the same arcs.
    fn successors(
        &self,
        state: &Self::State,
    ) -> Result<Vec<Successor<Self::State, Self::Action>>, GenerationError>;

    /// Goal test over a complete path (root to head)
    fn is_goal(&self, path: &SearchPath<Self::State, Self::Action>) -> bool;

    /// Draw one successor uniformly at random
    ///
    /// The default implementation enumerates all successors and picks one.
    /// Lazy generators that can draw a single successor without listing its
    /// siblings override it. Returns `GenerationError::NoSuccessor` for states without successors.
    fn random_successor(
        &self,
        state: &Self::State,
        rng: &mut ChaCha20Rng,
    ) -> Result<Successor<Self::State, Self::Action>, GenerationError> {
        let mut successors = self.successors(state)?;
        if successors.is_empty() {
            return Err(GenerationError::NoSuccessor);
        }
        let idx = rng.gen_range(0..successors.len());
        Ok(successors.swap_remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Chain 0 -> 1 -> 2 with a fork at 1.
    #[derive(Debug)]
    struct Fork;

    impl GraphGenerator for Fork {
        type State = u32;
        type Action = char;

        fn root(&self) -> u32 {
            0
        }

        fn successors(&self, state: &u32) -> Result<Vec<Successor<u32, char>>, GenerationError> {
            Ok(match state {
                0 => vec![Successor::new('a', 1)],
                1 => vec![Successor::new('b', 2), Successor::new('c', 3)],
                _ => Vec::new(),
            })
        }

        fn is_goal(&self, path: &SearchPath<u32, char>) -> bool {
            *path.head() >= 2
        }
    }

    #[test]
    fn test_default_random_successor_draws_from_full_set() {
        let fork = Fork;
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let succ = fork.random_successor(&1, &mut rng).unwrap();
            assert!(succ.to == 2 || succ.to == 3);
            seen.insert(succ.action);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_default_random_successor_on_leaf() {
        let fork = Fork;
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let err = fork.random_successor(&3, &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::NoSuccessor));
    }
}
