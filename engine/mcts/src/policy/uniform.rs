//! Uniform random policy, the usual default policy.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search_core::SearchPath;

use super::{ensure_candidates, Policy, PolicyContext, PolicyError, TreePolicy};

/// Picks every candidate with equal probability.
///
/// Also usable as a tree policy; updates are ignored.
#[derive(Debug, Clone)]
pub struct UniformRandomPolicy {
    rng: ChaCha20Rng,
}

impl UniformRandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn from_rng(rng: ChaCha20Rng) -> Self {
        Self { rng }
    }
}

impl<N, A: Clone> Policy<N, A> for UniformRandomPolicy {
    fn choose_action(
        &mut self,
        _ctx: &PolicyContext<'_, N, A>,
        _node: &N,
        candidates: &[(A, N)],
    ) -> Result<A, PolicyError> {
        ensure_candidates(candidates)?;
        let idx = self.rng.gen_range(0..candidates.len());
        Ok(candidates[idx].0.clone())
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

impl<N, A: Clone> TreePolicy<N, A> for UniformRandomPolicy {
    fn update_path(&mut self, _path: &SearchPath<N, A>, _score: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ExploredGraph;

    #[test]
    fn test_uniform_covers_all_candidates() {
        let graph: ExploredGraph<u32, u32> = ExploredGraph::new(0);
        let ctx = PolicyContext::new(&graph);
        let mut policy = UniformRandomPolicy::new(3);
        let candidates: Vec<(u32, u32)> = (0..4).map(|a| (a, a + 10)).collect();

        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let a = policy.choose_action(&ctx, &0, &candidates).unwrap();
            counts[a as usize] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed counts {counts:?}");
        }
    }

    #[test]
    fn test_uniform_rejects_empty() {
        let graph: ExploredGraph<u32, u32> = ExploredGraph::new(0);
        let ctx = PolicyContext::new(&graph);
        let mut policy = UniformRandomPolicy::new(3);
        assert_eq!(
            policy.choose_action(&ctx, &0, &Vec::<(u32, u32)>::new()).unwrap_err(),
            PolicyError::NoCandidates
        );
    }

    #[test]
    fn test_same_seed_same_choices() {
        let graph: ExploredGraph<u32, u32> = ExploredGraph::new(0);
        let ctx = PolicyContext::new(&graph);
        let candidates: Vec<(u32, u32)> = (0..7).map(|a| (a, a)).collect();
        let mut a = UniformRandomPolicy::new(11);
        let mut b = UniformRandomPolicy::new(11);
        for _ in 0..20 {
            assert_eq!(
                a.choose_action(&ctx, &0, &candidates).unwrap(),
                b.choose_action(&ctx, &0, &candidates).unwrap()
            );
        }
    }
}
