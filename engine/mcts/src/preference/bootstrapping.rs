//! Bootstrapping preference kernel.
//!
//! Keeps a bounded score history per state. Rankings over the children of a
//! node are drawn by resampling each child's history with replacement,
//! reducing every resample with a [`super::BootstrapStatistic`] and sorting the
//! children by the result (lowest cost first).

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search_core::SearchPath;
use tracing::trace;

use super::PreferenceKernel;
use crate::config::BootstrapConfig;
use crate::graph::ExploredGraph;

#[derive(Debug)]
pub struct BootstrappingPreferenceKernel<N> {
    config: BootstrapConfig,
    observations: HashMap<N, VecDeque<f64>>,
    last_rankings: HashMap<N, Vec<Vec<N>>>,
    rng: ChaCha20Rng,
}

impl<N> BootstrappingPreferenceKernel<N>
where
    N: Clone + Eq + Hash + Debug,
{
    pub fn new(config: BootstrapConfig) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(config.seed);
        Self {
            config,
            observations: HashMap::new(),
            last_rankings: HashMap::new(),
            rng,
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Score history of `state`, oldest first
    pub fn observations(&self, state: &N) -> Option<&VecDeque<f64>> {
        self.observations.get(state)
    }

    pub fn observation_count(&self, state: &N) -> usize {
        self.observations.get(state).map_or(0, VecDeque::len)
    }

    /// Rankings produced by the most recent draw for `node`
    pub fn last_rankings(&self, node: &N) -> Option<&[Vec<N>]> {
        self.last_rankings.get(node).map(Vec::as_slice)
    }

    fn children<A>(graph: &ExploredGraph<N, A>, node: &N) -> Vec<N>
    where
        A: Clone + Eq + Hash + Debug,
    {
        match graph.id_of(node) {
            Some(id) => graph
                .successors(id)
                .iter()
                .map(|(_, child)| graph.state(*child).clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn draw_rankings(&mut self, children: &[N]) -> Option<Vec<Vec<N>>> {
        let mut histories = Vec::with_capacity(children.len());
        for child in children {
            match self.observations.get(child) {
                Some(history) if !history.is_empty() => histories.push(history),
                _ => return None,
            }
        }

        let num_bootstraps = self.config.bootstraps_per_child * children.len();
        let samples = self.config.samples_per_bootstrap;
        let mut rankings = Vec::with_capacity(num_bootstraps);
        let mut resample = vec![0.0; samples];
        let mut scores = vec![0.0; children.len()];

        for _ in 0..num_bootstraps {
            for (score, history) in scores.iter_mut().zip(histories.iter()) {
                for slot in resample.iter_mut() {
                    *slot = history[self.rng.gen_range(0..history.len())];
                }
                *score = self.config.statistic.apply(&mut resample);
            }
            let mut order: Vec<usize> = (0..children.len()).collect();
            order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
            rankings.push(order.into_iter().map(|i| children[i].clone()).collect());
        }
        Some(rankings)
    }
}

impl<N, A> PreferenceKernel<N, A> for BootstrappingPreferenceKernel<N>
where
    N: Clone + Eq + Hash + Debug + Send,
    A: Clone + Eq + Hash + Debug,
{
    fn signal_new_score(&mut self, path: &SearchPath<N, A>, score: f64) {
        for node in path.nodes() {
            let history = self.observations.entry(node.clone()).or_default();
            history.push_back(score);
            if history.len() > self.config.max_history {
                history.pop_front();
            }
        }
    }

    fn can_produce_reliable_rankings(&self, graph: &ExploredGraph<N, A>, node: &N) -> bool {
        let children = Self::children(graph, node);
        !children.is_empty()
            && children
                .iter()
                .all(|child| self.observation_count(child) >= self.config.min_observations_per_child)
    }

    fn rankings_for_children(&mut self, graph: &ExploredGraph<N, A>, node: &N) -> Option<Vec<Vec<N>>> {
        let children = Self::children(graph, node);
        let rankings = self.draw_rankings(&children)?;
        trace!(node = ?node, rankings = rankings.len(), "drew bootstrap rankings");
        self.last_rankings.insert(node.clone(), rankings.clone());
        Some(rankings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_core::Successor;

    /// root -> {a, b}
    fn graph() -> ExploredGraph<&'static str, u8> {
        let mut graph = ExploredGraph::new("root");
        graph
            .attach_successors(
                graph.root(),
                vec![Successor::new(0, "a"), Successor::new(1, "b")],
            )
            .unwrap();
        graph
    }

    fn observe(kernel: &mut BootstrappingPreferenceKernel<&'static str>, child: &'static str, action: u8, score: f64) {
        let path = SearchPath::root_only("root").extended(action, child);
        PreferenceKernel::<&str, u8>::signal_new_score(kernel, &path, score);
    }

    #[test]
    fn test_history_is_bounded() {
        let config = BootstrapConfig {
            max_history: 3,
            ..BootstrapConfig::default()
        };
        let mut kernel = BootstrappingPreferenceKernel::new(config);
        for score in [1.0, 2.0, 3.0, 4.0, 5.0] {
            observe(&mut kernel, "a", 0, score);
        }
        let history: Vec<f64> = kernel.observations(&"a").unwrap().iter().copied().collect();
        assert_eq!(history, vec![3.0, 4.0, 5.0]);
        assert_eq!(kernel.observation_count(&"root"), 3);
    }

    #[test]
    fn test_reliability_threshold_is_inclusive() {
        let graph = graph();
        let mut kernel = BootstrappingPreferenceKernel::new(BootstrapConfig::default().with_min_observations(2));

        observe(&mut kernel, "a", 0, 1.0);
        observe(&mut kernel, "a", 0, 1.0);
        observe(&mut kernel, "b", 1, 2.0);
        assert!(!kernel.can_produce_reliable_rankings(&graph, &"root"));

        observe(&mut kernel, "b", 1, 2.0);
        assert!(kernel.can_produce_reliable_rankings(&graph, &"root"));
    }

    #[test]
    fn test_rankings_prefer_lower_cost() {
        let graph = graph();
        let mut kernel = BootstrappingPreferenceKernel::new(BootstrapConfig::default());
        for _ in 0..5 {
            observe(&mut kernel, "a", 0, 1.0);
            observe(&mut kernel, "b", 1, 9.0);
        }

        let rankings = kernel.rankings_for_children(&graph, &"root").unwrap();
        // 10 bootstraps per child, 2 children
        assert_eq!(rankings.len(), 20);
        assert!(rankings.iter().all(|r| r == &vec!["a", "b"]));
        assert_eq!(kernel.last_rankings(&"root").map(<[_]>::len), Some(20));
    }

    #[test]
    fn test_rankings_need_observations_for_every_child() {
        let graph = graph();
        let mut kernel = BootstrappingPreferenceKernel::new(BootstrapConfig::default());
        observe(&mut kernel, "a", 0, 1.0);
        assert!(kernel.rankings_for_children(&graph, &"root").is_none());
        assert!(kernel.last_rankings(&"root").is_none());
    }

    #[test]
    fn test_unknown_node_is_not_reliable() {
        let graph = graph();
        let kernel = BootstrappingPreferenceKernel::new(BootstrapConfig::default().with_min_observations(0));
        assert!(!PreferenceKernel::<&str, u8>::can_produce_reliable_rankings(&kernel, &graph, &"zzz"));
        assert!(PreferenceKernel::<&str, u8>::can_produce_reliable_rankings(&kernel, &graph, &"root"));
    }
}
