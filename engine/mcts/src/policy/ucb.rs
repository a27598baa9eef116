//! UCB-family tree policy with pluggable utilities.
//!
//! Score of a child: `utility(observations) + phi_inv(alpha * ln(t) / n)`,
//! where `t` counts policy updates, `n` is the number of observations of
//! the child and `phi_inv(x) = max(2b * sqrt(x / a), 2b * (x / a)^(q / 2))`.
//! Children without observations are always tried first. At a node without
//! any statistics the arc is drawn uniformly at random.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search_core::SearchPath;
use tracing::trace;

use super::{ensure_candidates, Policy, PolicyContext, PolicyError, PolicyKey, TreePolicy};
use crate::config::{UcbConfig, UtilityKind};

/// Scores of one arc, kept sorted ascending with insertion order on the side.
///
/// When bounded, inserting beyond capacity evicts the oldest observation.
#[derive(Debug, Clone, Default)]
pub struct SortedObservations {
    sorted: Vec<f64>,
    arrival: VecDeque<f64>,
    capacity: Option<usize>,
}

impl SortedObservations {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            sorted: Vec::new(),
            arrival: VecDeque::new(),
            capacity,
        }
    }

    pub fn insert(&mut self, score: f64) {
        if let Some(cap) = self.capacity {
            while self.arrival.len() >= cap.max(1) {
                let Some(oldest) = self.arrival.pop_front() else {
                    break;
                };
                let pos = self.sorted.partition_point(|x| x.total_cmp(&oldest).is_lt());
                if pos < self.sorted.len() {
                    self.sorted.remove(pos);
                }
            }
        }
        let pos = self.sorted.partition_point(|x| x.total_cmp(&score).is_le());
        self.sorted.insert(pos, score);
        self.arrival.push_back(score);
    }

    /// Ascending scores
    pub fn as_slice(&self) -> &[f64] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.sorted.is_empty() {
            None
        } else {
            Some(self.sorted.iter().sum::<f64>() / self.sorted.len() as f64)
        }
    }
}

/// Utility of a child's observed cost distribution (higher is better).
pub trait UcbUtility: Debug + Send {
    /// Only called with at least one observation.
    fn utility(&self, observations: &SortedObservations) -> f64;
    fn a(&self) -> f64;
    fn b(&self) -> f64;
    fn q(&self) -> f64;
}

/// Negated empirical Value-at-Risk of the costs.
///
/// Picks the order statistic at position `ceil((1 - alpha) * n)` (1-based)
/// of the ascending costs, i.e. a pessimistic cost, and negates it.
#[derive(Debug, Clone, Copy)]
pub struct ValueAtRisk {
    pub alpha: f64,
    pub b: f64,
}

impl ValueAtRisk {
    pub fn new(alpha: f64, b: f64) -> Self {
        Self { alpha, b }
    }

    pub fn index(&self, n: usize) -> usize {
        let rank = ((1.0 - self.alpha) * n as f64).ceil() as usize;
        rank.saturating_sub(1).min(n.saturating_sub(1))
    }
}

impl UcbUtility for ValueAtRisk {
    fn utility(&self, observations: &SortedObservations) -> f64 {
        let sorted = observations.as_slice();
        -sorted[self.index(sorted.len())]
    }

    fn a(&self) -> f64 {
        1.0
    }

    fn b(&self) -> f64 {
        self.b
    }

    fn q(&self) -> f64 {
        1.0
    }
}

/// Negated mean cost.
#[derive(Debug, Clone, Copy)]
pub struct NegatedMean {
    pub b: f64,
}

impl UcbUtility for NegatedMean {
    fn utility(&self, observations: &SortedObservations) -> f64 {
        -observations.mean().unwrap_or(0.0)
    }

    fn a(&self) -> f64 {
        1.0
    }

    fn b(&self) -> f64 {
        self.b
    }

    fn q(&self) -> f64 {
        1.0
    }
}

#[derive(Debug)]
pub struct UcbPolicy<N, A> {
    utility: Box<dyn UcbUtility>,
    exploration_alpha: f64,
    max_observations: Option<usize>,
    observations: HashMap<N, HashMap<A, SortedObservations>>,
    t: u64,
    rng: ChaCha20Rng,
}

impl<N: PolicyKey, A: PolicyKey> UcbPolicy<N, A> {
    pub fn new(config: &UcbConfig) -> Self {
        let utility: Box<dyn UcbUtility> = match config.utility {
            UtilityKind::ValueAtRisk => Box::new(ValueAtRisk::new(config.var_alpha, config.b)),
            UtilityKind::NegatedMean => Box::new(NegatedMean { b: config.b }),
        };
        Self::with_utility(utility, config.exploration_alpha, config.max_observations)
            .with_seed(config.seed)
    }

    pub fn with_utility(
        utility: Box<dyn UcbUtility>,
        exploration_alpha: f64,
        max_observations: Option<usize>,
    ) -> Self {
        Self {
            utility,
            exploration_alpha,
            max_observations,
            observations: HashMap::new(),
            t: 0,
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }

    /// Reseed the stream used at nodes without statistics.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    /// Number of updates so far
    pub fn updates(&self) -> u64 {
        self.t
    }

    pub fn observations(&self, node: &N, action: &A) -> Option<&SortedObservations> {
        self.observations.get(node).and_then(|m| m.get(action))
    }

    fn phi_inverse(&self, x: f64) -> f64 {
        let a = self.utility.a();
        let b = self.utility.b();
        let q = self.utility.q();
        let ratio = x / a;
        (2.0 * b * ratio.sqrt()).max(2.0 * b * ratio.powf(q / 2.0))
    }

    /// Upper confidence score of an observed arc
    pub fn score(&self, observations: &SortedObservations) -> f64 {
        let log_t = (self.t.max(1) as f64).ln();
        let bonus = self.phi_inverse(self.exploration_alpha * log_t / observations.len() as f64);
        self.utility.utility(observations) + bonus
    }
}

impl<N: PolicyKey, A: PolicyKey> Policy<N, A> for UcbPolicy<N, A> {
    fn choose_action(
        &mut self,
        _ctx: &PolicyContext<'_, N, A>,
        node: &N,
        candidates: &[(A, N)],
    ) -> Result<A, PolicyError> {
        ensure_candidates(candidates)?;
        let Some(per_action) = self.observations.get(node) else {
            let idx = self.rng.gen_range(0..candidates.len());
            return Ok(candidates[idx].0.clone());
        };

        let mut best: Option<(&A, f64)> = None;
        for (action, _) in candidates {
            let obs = match per_action.get(action) {
                Some(obs) if !obs.is_empty() => obs,
                _ => {
                    trace!(node = ?node, action = ?action, "unobserved arc");
                    return Ok(action.clone());
                }
            };
            let score = self.score(obs);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((action, score));
            }
        }
        match best {
            Some((action, score)) => {
                trace!(node = ?node, action = ?action, score, "UCB choice");
                Ok(action.clone())
            }
            None => Err(PolicyError::NoCandidates),
        }
    }

    fn name(&self) -> &'static str {
        "ucb"
    }
}

impl<N: PolicyKey, A: PolicyKey> TreePolicy<N, A> for UcbPolicy<N, A> {
    fn update_path(&mut self, path: &SearchPath<N, A>, score: f64) {
        let capacity = self.max_observations;
        for (node, action) in path.steps() {
            self.observations
                .entry(node.clone())
                .or_default()
                .entry(action.clone())
                .or_insert_with(|| SortedObservations::new(capacity))
                .insert(score);
        }
        self.t += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ExploredGraph;

    fn path(action: char, child: u32) -> SearchPath<u32, char> {
        SearchPath::root_only(0).extended(action, child)
    }

    #[test]
    fn test_sorted_insertion() {
        let mut obs = SortedObservations::new(None);
        for s in [3.0, 1.0, 2.0, 5.0, 4.0, 2.0] {
            obs.insert(s);
        }
        assert_eq!(obs.as_slice(), &[1.0, 2.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((obs.mean().unwrap() - 17.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounded_observations_evict_oldest() {
        let mut obs = SortedObservations::new(Some(3));
        for s in [5.0, 1.0, 3.0, 4.0] {
            obs.insert(s);
        }
        // 5.0 was the oldest
        assert_eq!(obs.as_slice(), &[1.0, 3.0, 4.0]);
        obs.insert(0.5);
        assert_eq!(obs.as_slice(), &[0.5, 3.0, 4.0]);
    }

    #[test]
    fn test_value_at_risk_index() {
        let var = ValueAtRisk::new(0.05, 1.0);
        assert_eq!(var.index(1), 0);
        assert_eq!(var.index(10), 9);
        assert_eq!(var.index(100), 94);

        let half = ValueAtRisk::new(0.5, 1.0);
        assert_eq!(half.index(4), 1);
        assert_eq!(ValueAtRisk::new(1.0, 1.0).index(4), 0);

        let mut obs = SortedObservations::new(None);
        for s in [1.0, 2.0, 3.0, 4.0] {
            obs.insert(s);
        }
        assert!((half.utility(&obs) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unobserved_child_preferred() {
        let graph: ExploredGraph<u32, char> = ExploredGraph::new(0);
        let ctx = PolicyContext::new(&graph);
        let mut policy: UcbPolicy<u32, char> = UcbPolicy::new(&UcbConfig::default());

        for _ in 0..5 {
            policy.update_path(&path('a', 1), 0.0);
        }
        let candidates = vec![('a', 1), ('b', 2)];
        for _ in 0..10 {
            assert_eq!(policy.choose_action(&ctx, &0, &candidates).unwrap(), 'b');
        }
    }

    #[test]
    fn test_unknown_node_draws_random_candidate() {
        let graph: ExploredGraph<u32, char> = ExploredGraph::new(0);
        let ctx = PolicyContext::new(&graph);
        let candidates = vec![('x', 7), ('y', 8), ('z', 9)];
        let draw = |seed: u64| -> Vec<char> {
            let config = UcbConfig::default().with_seed(seed);
            let mut policy: UcbPolicy<u32, char> = UcbPolicy::new(&config);
            (0..64)
                .map(|_| policy.choose_action(&ctx, &3, &candidates).unwrap())
                .collect()
        };

        let picks = draw(5);
        for (action, _) in &candidates {
            assert!(picks.contains(action), "{action} never drawn");
        }
        // Same seed, same draws
        assert_eq!(picks, draw(5));
    }

    #[test]
    fn test_exploits_cheaper_child_with_equal_counts() {
        let graph: ExploredGraph<u32, char> = ExploredGraph::new(0);
        let ctx = PolicyContext::new(&graph);
        let config = UcbConfig::default().with_utility(UtilityKind::NegatedMean);
        let mut policy: UcbPolicy<u32, char> = UcbPolicy::new(&config);

        for _ in 0..20 {
            policy.update_path(&path('a', 1), 10.0);
            policy.update_path(&path('b', 2), 1.0);
        }
        assert_eq!(policy.updates(), 40);
        let candidates = vec![('a', 1), ('b', 2)];
        assert_eq!(policy.choose_action(&ctx, &0, &candidates).unwrap(), 'b');
    }

    #[test]
    fn test_exploration_bonus_shrinks_with_observations() {
        let mut policy: UcbPolicy<u32, char> = UcbPolicy::new(&UcbConfig::default());
        for _ in 0..10 {
            policy.update_path(&path('a', 1), 1.0);
        }
        policy.update_path(&path('b', 2), 1.0);

        let few = policy.score(policy.observations(&0, &'b').unwrap());
        let many = policy.score(policy.observations(&0, &'a').unwrap());
        assert!(few > many);
    }

    #[test]
    fn test_update_covers_every_step() {
        let mut policy: UcbPolicy<u32, char> = UcbPolicy::new(&UcbConfig::default());
        let long = SearchPath::root_only(0).extended('a', 1).extended('b', 2).extended('c', 3);
        policy.update_path(&long, 4.0);

        assert_eq!(policy.observations(&0, &'a').unwrap().len(), 1);
        assert_eq!(policy.observations(&1, &'b').unwrap().len(), 1);
        assert_eq!(policy.observations(&2, &'c').unwrap().len(), 1);
        assert!(policy.observations(&3, &'c').is_none());
    }
}
