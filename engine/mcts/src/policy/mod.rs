//! Action-selection policies.
//!
//! A [`Policy`] picks one action among the candidates offered at a node. A
//! [`TreePolicy`] additionally learns from playout outcomes through
//! [`TreePolicy::update_path`]. The search uses a tree policy while descending
//! through the explored graph and a default policy at the frontier.
//!
//! Policies are flat, independent implementations; combining them is done by
//! [`EnsemblePolicy`], which is itself a policy.

use std::fmt::Debug;
use std::hash::Hash;

use search_core::SearchPath;
use thiserror::Error;

use crate::graph::ExploredGraph;

pub mod ensemble;
pub mod gamma;
pub mod plackett_luce;
pub mod ucb;
pub mod uniform;

pub use ensemble::{EnsemblePolicy, MemberSelection};
pub use gamma::{CombinedGamma, CosLinGamma, GammaFunction};
pub use plackett_luce::PlackettLucePolicy;
pub use ucb::{NegatedMean, SortedObservations, UcbPolicy, UcbUtility, ValueAtRisk};
pub use uniform::UniformRandomPolicy;

/// Raised when a policy cannot predict an action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    #[error("No candidate actions to choose from")]
    NoCandidates,

    #[error("Action prediction failed: {0}")]
    Failed(String),
}

/// Read-only view of the search state handed to policies.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a, N, A> {
    pub graph: &'a ExploredGraph<N, A>,
}

impl<'a, N, A> PolicyContext<'a, N, A> {
    pub fn new(graph: &'a ExploredGraph<N, A>) -> Self {
        Self { graph }
    }
}

/// Chooses one action among the candidate arcs of a node.
///
/// `candidates` holds `(action, successor)` pairs in a stable order and is
/// never empty when called by the search.
pub trait Policy<N, A>: Send {
    fn choose_action(
        &mut self,
        ctx: &PolicyContext<'_, N, A>,
        node: &N,
        candidates: &[(A, N)],
    ) -> Result<A, PolicyError>;

    /// Short name for logs and reports
    fn name(&self) -> &'static str;
}

/// A policy that learns from observed playout scores.
pub trait TreePolicy<N, A>: Policy<N, A> {
    /// Feed back the score of a playout.
    ///
    /// `path` is the part of the playout that is attached to the explored
    /// graph, starting at the root.
    fn update_path(&mut self, path: &SearchPath<N, A>, score: f64);
}

/// Bounds shared by every state and action type the policies work with.
pub trait PolicyKey: Clone + Eq + Hash + Debug + Send {}

impl<T: Clone + Eq + Hash + Debug + Send> PolicyKey for T {}

pub(crate) fn ensure_candidates<N, A>(candidates: &[(A, N)]) -> Result<(), PolicyError> {
    if candidates.is_empty() {
        Err(PolicyError::NoCandidates)
    } else {
        Ok(())
    }
}
