//! Plackett-Luce tree policy.
//!
//! Children are sampled proportionally to skills estimated from rankings a
//! [`PreferenceKernel`] draws over them, sharpened by a gamma exponent that
//! grows with the visits of the node. Until the kernel is reliable, and with
//! a depth-scaled epsilon probability, choice is uniform.

use std::collections::HashMap;
use std::marker::PhantomData;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search_core::SearchPath;
use tracing::{debug, trace};

use super::gamma::{CombinedGamma, GammaFunction};
use super::uniform::UniformRandomPolicy;
use super::{ensure_candidates, Policy, PolicyContext, PolicyError, PolicyKey, TreePolicy};
use crate::config::{BootstrapConfig, PlackettLuceConfig};
use crate::graph::ExploredGraph;
use crate::pl::{default_skills, MmEstimator, PlProblemEncoder};
use crate::preference::{BootstrappingPreferenceKernel, PreferenceKernel};

pub struct PlackettLucePolicy<N, A, K = BootstrappingPreferenceKernel<N>> {
    config: PlackettLuceConfig,
    kernel: K,
    gamma: CombinedGamma,
    estimator: MmEstimator,
    /// Skills per node, aligned with the node's successor order in the graph
    skills: HashMap<N, Vec<f64>>,
    visits: HashMap<N, u64>,
    /// (position, length) of the longest playout seen through each node
    depth_record: HashMap<N, (usize, usize)>,
    /// Probability with which each node was last sampled by its parent
    last_local_probability: HashMap<N, f64>,
    rng: ChaCha20Rng,
    fallback: UniformRandomPolicy,
    _action: PhantomData<fn() -> A>,
}

impl<N: PolicyKey, A: PolicyKey> PlackettLucePolicy<N, A> {
    /// Policy backed by a bootstrapping kernel.
    pub fn with_bootstrapping(config: PlackettLuceConfig, kernel_config: BootstrapConfig) -> Self {
        Self::new(config, BootstrappingPreferenceKernel::new(kernel_config))
    }
}

impl<N, A, K> PlackettLucePolicy<N, A, K>
where
    N: PolicyKey,
    A: PolicyKey,
    K: PreferenceKernel<N, A>,
{
    pub fn new(config: PlackettLuceConfig, kernel: K) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        let fallback = UniformRandomPolicy::new(rng.gen());
        Self {
            gamma: CombinedGamma::new(config.short_gamma, config.long_gamma_per_child),
            estimator: MmEstimator::new(config.mm_max_iterations, config.mm_tolerance),
            config,
            kernel,
            skills: HashMap::new(),
            visits: HashMap::new(),
            depth_record: HashMap::new(),
            last_local_probability: HashMap::new(),
            rng,
            fallback,
            _action: PhantomData,
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Last estimated skills of the children of `node`, in successor order
    pub fn skills(&self, node: &N) -> Option<&[f64]> {
        self.skills.get(node).map(Vec::as_slice)
    }

    pub fn visits(&self, node: &N) -> u64 {
        self.visits.get(node).copied().unwrap_or(0)
    }

    /// Position over length of the longest playout through `node`
    pub fn relative_depth(&self, node: &N) -> f64 {
        match self.depth_record.get(node) {
            Some(&(position, len)) if len > 0 => position as f64 / len as f64,
            _ => 0.0,
        }
    }

    /// Product of the last local selection probabilities from the root down
    /// to `node`, following first predecessors.
    fn node_probability(&self, graph: &ExploredGraph<N, A>, node: &N) -> f64 {
        let Some(mut id) = graph.id_of(node) else {
            return 1.0;
        };
        let mut probability = 1.0;
        for _ in 0..graph.len() {
            let Some(&parent) = graph.predecessors(id).first() else {
                break;
            };
            probability *= self
                .last_local_probability
                .get(graph.state(id))
                .copied()
                .unwrap_or(1.0);
            id = parent;
        }
        probability
    }

    fn fallback_choice(
        &mut self,
        ctx: &PolicyContext<'_, N, A>,
        node: &N,
        candidates: &[(A, N)],
    ) -> Result<A, PolicyError> {
        let action = self.fallback.choose_action(ctx, node, candidates)?;
        let probability = 1.0 / candidates.len() as f64;
        for (a, child) in candidates {
            if *a == action {
                self.last_local_probability.insert(child.clone(), probability);
            }
        }
        Ok(action)
    }

    fn estimate_skills(
        &mut self,
        graph: &ExploredGraph<N, A>,
        node: &N,
        gamma: f64,
    ) -> Option<(Vec<f64>, PlProblemEncoder<N>)> {
        let children: Vec<N> = graph
            .id_of(node)
            .map(|id| {
                graph
                    .successors(id)
                    .iter()
                    .map(|(_, child)| graph.state(*child).clone())
                    .collect()
            })
            .unwrap_or_default();
        let rankings = self.kernel.rankings_for_children(graph, node)?;
        let mut encoder = PlProblemEncoder::with_objects(&children);
        let problem = encoder.encode(&rankings);

        let skills = if gamma != 0.0 {
            let previous = self.skills.get(node).map(Vec::as_slice);
            let estimated = self.estimator.estimate(&problem, previous);
            self.skills.insert(node.clone(), estimated.clone());
            estimated
        } else {
            default_skills(problem.num_objects)
        };
        Some((skills, encoder))
    }
}

impl<N, A, K> std::fmt::Debug for PlackettLucePolicy<N, A, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlackettLucePolicy")
            .field("config", &self.config)
            .field("nodes_with_skills", &self.skills.len())
            .field("visited_nodes", &self.visits.len())
            .finish_non_exhaustive()
    }
}

impl<N, A, K> Policy<N, A> for PlackettLucePolicy<N, A, K>
where
    N: PolicyKey,
    A: PolicyKey,
    K: PreferenceKernel<N, A>,
{
    fn choose_action(
        &mut self,
        ctx: &PolicyContext<'_, N, A>,
        node: &N,
        candidates: &[(A, N)],
    ) -> Result<A, PolicyError> {
        ensure_candidates(candidates)?;
        let graph = ctx.graph;
        if !self.kernel.can_produce_reliable_rankings(graph, node) {
            trace!(node = ?node, "kernel not reliable, choosing uniformly");
            return self.fallback_choice(ctx, node, candidates);
        }

        let visits = self.visits(node);
        let num_children = graph.id_of(node).map_or(candidates.len(), |id| graph.successors(id).len());
        let relative_depth = self.relative_depth(node);
        let node_probability = self.node_probability(graph, node);
        let gamma = self.gamma.gamma(visits, node_probability, relative_depth, num_children);

        if self.rng.gen::<f64>() < self.config.epsilon * (1.0 - relative_depth) {
            trace!(node = ?node, "epsilon exploration");
            return self.fallback_choice(ctx, node, candidates);
        }

        let Some((skills, encoder)) = self.estimate_skills(graph, node, gamma) else {
            debug!(node = ?node, "no rankings for reliable node, choosing uniformly");
            return self.fallback_choice(ctx, node, candidates);
        };

        let mut weights: Vec<f64> = skills.iter().map(|s| s.powf(gamma)).collect();
        let total: f64 = weights.iter().sum();
        if total > 0.0 && total.is_finite() {
            for w in &mut weights {
                *w /= total;
            }
        }

        let candidate_weights: Vec<f64> = candidates
            .iter()
            .map(|(_, child)| {
                encoder
                    .index_of(child)
                    .and_then(|i| weights.get(i))
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect();
        let mass: f64 = candidate_weights.iter().sum();
        if mass <= 0.0 || !mass.is_finite() {
            debug!(node = ?node, "zero skill mass on candidates, taking the first");
            return Ok(candidates[0].0.clone());
        }

        let r = self.rng.gen::<f64>() * mass;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for ((action, child), weight) in candidates.iter().zip(&candidate_weights) {
            self.last_local_probability.insert(child.clone(), weight / mass);
            cumulative += weight;
            if chosen.is_none() && cumulative >= r {
                chosen = Some(action.clone());
            }
        }
        let action = chosen.unwrap_or_else(|| candidates[candidates.len() - 1].0.clone());
        trace!(node = ?node, action = ?action, gamma, visits, "Plackett-Luce choice");
        Ok(action)
    }

    fn name(&self) -> &'static str {
        "plackett-luce"
    }
}

impl<N, A, K> TreePolicy<N, A> for PlackettLucePolicy<N, A, K>
where
    N: PolicyKey,
    A: PolicyKey,
    K: PreferenceKernel<N, A>,
{
    fn update_path(&mut self, path: &SearchPath<N, A>, score: f64) {
        self.kernel.signal_new_score(path, score);
        let len = path.len();
        for (position, node) in path.nodes().iter().enumerate() {
            *self.visits.entry(node.clone()).or_insert(0) += 1;
            let record = self.depth_record.entry(node.clone()).or_insert((position, len));
            if len > record.1 {
                *record = (position, len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::BootstrapStatistic;
    use search_core::Successor;

    fn star(children: u32) -> ExploredGraph<u32, u32> {
        let mut graph = ExploredGraph::new(0);
        let successors = (1..=children).map(|c| Successor::new(c, c)).collect();
        graph.attach_successors(graph.root(), successors).unwrap();
        graph
    }

    fn candidates(children: u32) -> Vec<(u32, u32)> {
        (1..=children).map(|c| (c, c)).collect()
    }

    fn policy(epsilon: f64, min_obs: usize) -> PlackettLucePolicy<u32, u32> {
        PlackettLucePolicy::with_bootstrapping(
            PlackettLuceConfig::default().with_seed(11).with_epsilon(epsilon),
            BootstrapConfig::default()
                .with_min_observations(min_obs)
                .with_statistic(BootstrapStatistic::Mean),
        )
    }

    fn single_step(child: u32) -> SearchPath<u32, u32> {
        SearchPath::root_only(0).extended(child, child)
    }

    #[test]
    fn test_unreliable_kernel_falls_back_to_uniform() {
        let graph = star(4);
        let ctx = PolicyContext::new(&graph);
        let mut policy = policy(0.0, 3);
        let cands = candidates(4);

        let draws = 4000;
        let mut counts = [0u32; 4];
        for _ in 0..draws {
            let action = policy.choose_action(&ctx, &0, &cands).unwrap();
            counts[(action - 1) as usize] += 1;
        }

        // Chi-square against uniform with 3 degrees of freedom; 16.27 is the
        // 0.001 critical value
        let expected = draws as f64 / 4.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi2 < 16.27, "counts {counts:?}, chi2 {chi2}");
    }

    #[test]
    fn test_reliable_kernel_prefers_cheaper_child() {
        let graph = star(3);
        let ctx = PolicyContext::new(&graph);
        let mut policy = policy(0.0, 3);
        for _ in 0..200 {
            policy.update_path(&single_step(1), 1.0);
            policy.update_path(&single_step(2), 5.0);
            policy.update_path(&single_step(3), 9.0);
        }
        assert_eq!(policy.visits(&0), 600);

        let cands = candidates(3);
        let mut picks = [0u32; 3];
        for _ in 0..300 {
            let action = policy.choose_action(&ctx, &0, &cands).unwrap();
            picks[(action - 1) as usize] += 1;
        }
        assert!(picks[0] > picks[1] && picks[0] > picks[2], "picks {picks:?}");

        let skills = policy.skills(&0).unwrap();
        assert_eq!(skills.len(), 3);
        assert!(skills[0] > skills[2]);
    }

    #[test]
    fn test_candidates_outside_rankings_are_never_picked_with_mass() {
        let graph = star(3);
        let ctx = PolicyContext::new(&graph);
        let mut policy = policy(0.0, 1);
        for _ in 0..100 {
            policy.update_path(&single_step(1), 1.0);
            policy.update_path(&single_step(2), 2.0);
            policy.update_path(&single_step(3), 3.0);
        }
        // Only children 2 and 3 are still open
        let cands = vec![(2, 2), (3, 3)];
        for _ in 0..50 {
            let action = policy.choose_action(&ctx, &0, &cands).unwrap();
            assert!(action == 2 || action == 3);
        }
    }

    #[test]
    fn test_depth_record_keeps_longest_playout() {
        let mut policy = policy(0.1, 3);
        let short = SearchPath::root_only(0).extended(1, 1);
        let long = SearchPath::root_only(0).extended(1, 1).extended(5, 5).extended(6, 6);

        policy.update_path(&short, 1.0);
        assert!((policy.relative_depth(&1) - 0.5).abs() < 1e-12);
        policy.update_path(&long, 1.0);
        assert!((policy.relative_depth(&1) - 0.25).abs() < 1e-12);
        policy.update_path(&short, 1.0);
        assert!((policy.relative_depth(&1) - 0.25).abs() < 1e-12);
        assert_eq!(policy.visits(&1), 3);
        assert!((policy.relative_depth(&99)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_candidates() {
        let graph = star(2);
        let ctx = PolicyContext::new(&graph);
        let mut policy = policy(0.1, 3);
        let err = policy.choose_action(&ctx, &0, &[]).unwrap_err();
        assert_eq!(err, PolicyError::NoCandidates);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let graph = star(5);
        let ctx = PolicyContext::new(&graph);
        let cands = candidates(5);
        let mut a = policy(0.5, 1);
        let mut b = policy(0.5, 1);
        for child in 1..=5 {
            a.update_path(&single_step(child), child as f64);
            b.update_path(&single_step(child), child as f64);
        }
        for _ in 0..20 {
            assert_eq!(
                a.choose_action(&ctx, &0, &cands).unwrap(),
                b.choose_action(&ctx, &0, &cands).unwrap()
            );
        }
    }
}
