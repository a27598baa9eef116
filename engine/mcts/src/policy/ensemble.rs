//! Ensemble of tree policies.
//!
//! Each decision is delegated to one member; every member sees every update,
//! so all of them keep learning while only one acts.

use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search_core::SearchPath;
use tracing::trace;

use super::{Policy, PolicyContext, PolicyError, TreePolicy};
use crate::config::ConfigError;

/// How the acting member is picked per decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberSelection {
    #[default]
    RoundRobin,
    Random,
}

impl FromStr for MemberSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "round-robin" | "round_robin" => Ok(Self::RoundRobin),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::UnknownVariant {
                field: "ensemble_selection",
                value: other.to_string(),
            }),
        }
    }
}

pub struct EnsemblePolicy<N, A> {
    members: Vec<Box<dyn TreePolicy<N, A>>>,
    selection: MemberSelection,
    next: usize,
    rng: ChaCha20Rng,
}

impl<N, A> EnsemblePolicy<N, A> {
    /// Fails when `members` is empty.
    pub fn new(
        members: Vec<Box<dyn TreePolicy<N, A>>>,
        selection: MemberSelection,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if members.is_empty() {
            return Err(ConfigError::Invalid {
                field: "ensemble_members",
                reason: "at least one member is required".into(),
            });
        }
        Ok(Self {
            members,
            selection,
            next: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_names(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    fn pick_member(&mut self) -> usize {
        match self.selection {
            MemberSelection::RoundRobin => {
                let idx = self.next % self.members.len();
                self.next = (idx + 1) % self.members.len();
                idx
            }
            MemberSelection::Random => self.rng.gen_range(0..self.members.len()),
        }
    }
}

impl<N, A> std::fmt::Debug for EnsemblePolicy<N, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsemblePolicy")
            .field("members", &self.member_names())
            .field("selection", &self.selection)
            .finish()
    }
}

impl<N, A> Policy<N, A> for EnsemblePolicy<N, A> {
    fn choose_action(
        &mut self,
        ctx: &PolicyContext<'_, N, A>,
        node: &N,
        candidates: &[(A, N)],
    ) -> Result<A, PolicyError> {
        let idx = self.pick_member();
        trace!(member = self.members[idx].name(), "ensemble dispatch");
        self.members[idx].choose_action(ctx, node, candidates)
    }

    fn name(&self) -> &'static str {
        "ensemble"
    }
}

impl<N, A> TreePolicy<N, A> for EnsemblePolicy<N, A> {
    fn update_path(&mut self, path: &SearchPath<N, A>, score: f64) {
        for member in &mut self.members {
            member.update_path(path, score);
        }
    }
}
