//! Scenario tests for the path search engine.

use super::*;
use crate::config::{BootstrapConfig, PlackettLuceConfig, UcbConfig};
use crate::evaluator::{FnEvaluator, PathLengthEvaluator};
use crate::policy::{
    EnsemblePolicy, MemberSelection, PlackettLucePolicy, UcbPolicy, UniformRandomPolicy,
};
use search_core::{RecordingSink, Successor};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Test generators
// =============================================================================

/// Complete binary tree; states are bit strings, leaves at `depth` are goals.
#[derive(Debug, Clone)]
struct BinaryTree {
    depth: usize,
}

impl GraphGenerator for BinaryTree {
    type State = Vec<u8>;
    type Action = u8;

    fn root(&self) -> Vec<u8> {
        Vec::new()
    }

    fn successors(&self, state: &Vec<u8>) -> Result<Vec<Successor<Vec<u8>, u8>>, GenerationError> {
        if state.len() >= self.depth {
            return Ok(Vec::new());
        }
        Ok((0..2u8)
            .map(|bit| {
                let mut next = state.clone();
                next.push(bit);
                Successor::new(bit, next)
            })
            .collect())
    }

    fn is_goal(&self, path: &SearchPath<Vec<u8>, u8>) -> bool {
        path.head().len() == self.depth
    }
}

/// Small graph over `u32` states given as an adjacency list.
#[derive(Debug, Clone)]
struct Table {
    arcs: Vec<(u32, u32, u32)>,
    goals: Vec<u32>,
}

impl GraphGenerator for Table {
    type State = u32;
    type Action = u32;

    fn root(&self) -> u32 {
        0
    }

    fn successors(&self, state: &u32) -> Result<Vec<Successor<u32, u32>>, GenerationError> {
        Ok(self
            .arcs
            .iter()
            .filter(|(from, _, _)| from == state)
            .map(|&(_, action, to)| Successor::new(action, to))
            .collect())
    }

    fn is_goal(&self, path: &SearchPath<u32, u32>) -> bool {
        self.goals.contains(path.head())
    }
}

/// Successor generation that fails or stalls at the root.
#[derive(Debug, Clone)]
struct Broken {
    sleep: Option<Duration>,
}

impl GraphGenerator for Broken {
    type State = u32;
    type Action = u32;

    fn root(&self) -> u32 {
        0
    }

    fn successors(&self, _state: &u32) -> Result<Vec<Successor<u32, u32>>, GenerationError> {
        match self.sleep {
            Some(duration) => {
                std::thread::sleep(duration);
                Ok(vec![Successor::new(1, 1)])
            }
            None => Err(GenerationError::Failed("backend unavailable".into())),
        }
    }

    fn is_goal(&self, path: &SearchPath<u32, u32>) -> bool {
        *path.head() == 1
    }
}

// =============================================================================
// Helpers
// =============================================================================

const TARGET: [u8; 3] = [1, 0, 1];

type CountingEvaluator<N, A> =
    FnEvaluator<Box<dyn Fn(&SearchPath<N, A>) -> Result<f64, EvaluationError> + Send + Sync>>;

/// Scores the target leaf 0 and every other leaf 1, counting calls.
fn target_evaluator(calls: &Arc<AtomicUsize>) -> CountingEvaluator<Vec<u8>, u8> {
    let calls = Arc::clone(calls);
    let score: Box<dyn Fn(&SearchPath<Vec<u8>, u8>) -> Result<f64, EvaluationError> + Send + Sync> =
        Box::new(move |path| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(if path.head().as_slice() == TARGET { 0.0 } else { 1.0 })
        });
    FnEvaluator::new(score)
}

fn ucb<N: PolicyKey + 'static, A: PolicyKey + 'static>() -> Box<dyn TreePolicy<N, A>> {
    Box::new(UcbPolicy::new(&UcbConfig::default()))
}

fn uniform<N: PolicyKey, A: PolicyKey>() -> Box<dyn Policy<N, A>> {
    Box::new(UniformRandomPolicy::new(7))
}

fn binary_search(
    depth: usize,
    calls: &Arc<AtomicUsize>,
) -> MctsPathSearch<Vec<u8>, u8, BinaryTree, CountingEvaluator<Vec<u8>, u8>> {
    MctsPathSearch::new(
        BinaryTree { depth },
        target_evaluator(calls),
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    )
}

// =============================================================================
// Exhaustion and caching
// =============================================================================

#[test]
fn test_binary_tree_runs_to_exhaustion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(3, &calls);
    let summary = search.run().unwrap();

    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 8);
    // one evaluation per distinct leaf, the rest served from the cache
    assert_eq!(calls.load(Ordering::SeqCst), 8);
    assert_eq!(summary.stats.evaluations, 8);
    assert!(summary.stats.cache_hits > 0);

    let best = summary.best.unwrap();
    assert_eq!(best.path.head().as_slice(), TARGET);
    assert_eq!(best.score, 0.0);

    let distinct: HashSet<_> = search
        .found_solutions()
        .iter()
        .map(|s| s.path.head().clone())
        .collect();
    assert_eq!(distinct.len(), 8);
    assert!(search.graph().is_fully_explored(search.graph().root()));
}

/// Playouts spent until the target leaf is reported, for one seed.
fn playouts_until_target(seed: u64) -> Option<u64> {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = MctsPathSearch::new(
        BinaryTree { depth: 3 },
        target_evaluator(&calls),
        Box::new(UcbPolicy::new(&UcbConfig::default().with_seed(seed))),
        Box::new(UniformRandomPolicy::new(seed.wrapping_add(1))),
        MctsConfig::for_testing().with_seed(seed.wrapping_add(2)),
    );
    loop {
        match search.next_event().unwrap() {
            SearchStep::Solution(s) if s.path.head().as_slice() == TARGET => {
                return Some(search.stats().playouts);
            }
            SearchStep::Exhausted => return None,
            _ => {}
        }
    }
}

#[test]
fn test_target_found_early() {
    // Twice the leaf count of the depth-3 tree
    let budget = 16;
    let hits = (0..100u64)
        .filter(|&seed| playouts_until_target(seed).is_some_and(|p| p <= budget))
        .count();
    assert!(hits >= 99, "target found within {budget} playouts for {hits}/100 seeds");
}

#[test]
fn test_exhausted_is_sticky() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(2, &calls);
    search.run().unwrap();

    assert!(search.is_exhausted());
    assert_eq!(search.next_event().unwrap(), SearchStep::Exhausted);
    assert_eq!(search.next_event().unwrap(), SearchStep::Exhausted);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_result_stream_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(1, &calls);

    assert_eq!(search.next_event().unwrap(), SearchStep::Initialized);
    let mut found = 0;
    loop {
        match search.next_event().unwrap() {
            SearchStep::Solution(solution) => {
                assert_eq!(solution.path.len(), 2);
                found += 1;
            }
            SearchStep::Exhausted => break,
            SearchStep::Initialized => panic!("initialized twice"),
        }
    }
    assert_eq!(found, 2);
}

#[test]
fn test_cached_score_per_path() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(3, &calls);
    search.run().unwrap();

    let target = SearchPath::new(
        vec![vec![], vec![1], vec![1, 0], vec![1, 0, 1]],
        vec![1, 0, 1],
    )
    .unwrap();
    assert_eq!(search.cached_score(&target), Some(0.0));
    assert_eq!(search.cached_score(&SearchPath::root_only(vec![9])), None);
}

#[test]
fn test_monotonic_exploration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(4, &calls);
    let mut nodes = search.graph().len();
    let mut expanded: HashSet<NodeId> = HashSet::new();

    loop {
        let step = search.next_event().unwrap();
        let graph = search.graph();
        assert!(graph.len() >= nodes, "graph shrank from {nodes} to {}", graph.len());
        nodes = graph.len();
        for id in &expanded {
            assert!(graph.is_expanded(*id), "{id:?} became unexpanded");
        }
        expanded.extend(
            (0..graph.len() as u32)
                .map(NodeId)
                .filter(|id| graph.is_expanded(*id)),
        );
        if step == SearchStep::Exhausted {
            break;
        }
    }

    assert_eq!(nodes, 31);
    // Every inner node of the depth-4 tree, no leaf
    assert_eq!(expanded.len(), 15);
    assert_eq!(search.graph().unexpanded_count(), 16);
}

#[test]
fn test_same_seed_same_solutions() {
    let run = || {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut search = binary_search(4, &calls);
        search.run().unwrap();
        search
            .found_solutions()
            .iter()
            .map(|s| s.path.head().clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_max_solutions_stops_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = MctsPathSearch::new(
        BinaryTree { depth: 4 },
        target_evaluator(&calls),
        ucb(),
        uniform(),
        MctsConfig::for_testing().with_max_solutions(3),
    );
    let summary = search.run().unwrap();
    assert!(!summary.exhausted);
    assert_eq!(summary.solutions, 3);
}

// =============================================================================
// Dead ends and graph shapes
// =============================================================================

#[test]
fn test_empty_root_is_exhausted_without_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let evaluator = FnEvaluator::new(move |_: &SearchPath<u32, u32>| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(0.0)
    });
    let generator = Table {
        arcs: Vec::new(),
        goals: vec![5],
    };
    let mut search =
        MctsPathSearch::new(generator, evaluator, ucb(), uniform(), MctsConfig::for_testing());

    assert_eq!(search.next_event().unwrap(), SearchStep::Initialized);
    assert_eq!(search.next_event().unwrap(), SearchStep::Exhausted);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(search.found_solutions().is_empty());
}

#[test]
fn test_dead_end_is_pruned() {
    // 0 -> 1 (dead end), 0 -> 2 -> 3 (goal)
    let generator = Table {
        arcs: vec![(0, 0, 1), (0, 1, 2), (2, 0, 3)],
        goals: vec![3],
    };
    let mut search = MctsPathSearch::new(
        generator,
        PathLengthEvaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    );
    let summary = search.run().unwrap();

    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 1);
    assert_eq!(summary.best.unwrap().path.nodes(), &[0, 2, 3]);

    let graph = search.graph();
    let dead = graph.id_of(&1).unwrap();
    assert!(graph.get(dead).is_dead_end());
    assert!(graph.is_fully_explored(dead));
}

#[test]
fn test_dag_shared_node() {
    // Two routes into node 3, then one arc to the goal 4
    let generator = Table {
        arcs: vec![(0, 0, 1), (0, 1, 2), (1, 0, 3), (2, 0, 3), (3, 0, 4)],
        goals: vec![4],
    };
    let mut search = MctsPathSearch::new(
        generator,
        PathLengthEvaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    );
    let summary = search.run().unwrap();

    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 2);
    let shared = search.graph().id_of(&3).unwrap();
    assert_eq!(search.graph().predecessors(shared).len(), 2);
    assert_eq!(search.graph().len(), 5);
}

#[test]
fn test_missing_successor_during_simulation() {
    // 0 -> 1 -> 2 and 2 is neither a goal nor has successors
    let generator = Table {
        arcs: vec![(0, 0, 1), (1, 0, 2)],
        goals: vec![7],
    };
    let mut search = MctsPathSearch::new(
        generator,
        PathLengthEvaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    );
    search.next_event().unwrap();
    let err = search.next_event().unwrap_err();
    assert!(matches!(err, SearchError::MissingSuccessor { ref state } if state == "2"));
    assert!(matches!(search.next_event(), Err(SearchError::Terminated)));
}

#[test]
fn test_duplicate_actions_are_fatal() {
    let generator = Table {
        arcs: vec![(0, 5, 1), (0, 5, 2)],
        goals: vec![1, 2],
    };
    let mut search = MctsPathSearch::new(
        generator,
        PathLengthEvaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    );
    search.next_event().unwrap();
    let err = search.next_event().unwrap_err();
    assert!(matches!(
        err,
        SearchError::Graph(GraphError::DuplicateAction { .. })
    ));
    // Nothing was attached
    assert_eq!(search.graph().len(), 1);
    assert!(matches!(search.next_event(), Err(SearchError::Terminated)));
}

#[test]
fn test_successor_generation_failure() {
    let mut search = MctsPathSearch::new(
        Broken { sleep: None },
        PathLengthEvaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    );
    search.next_event().unwrap();
    let err = search.next_event().unwrap_err();
    assert!(matches!(err, SearchError::SuccessorGeneration { ref state, .. } if state == "0"));
}

#[test]
fn test_successor_timeout() {
    let config = MctsConfig::for_testing().with_successor_timeout(Duration::from_millis(20));
    let mut search = MctsPathSearch::new(
        Broken {
            sleep: Some(Duration::from_millis(1500)),
        },
        PathLengthEvaluator,
        ucb(),
        uniform(),
        config,
    );
    search.next_event().unwrap();

    let started = Instant::now();
    let err = search.next_event().unwrap_err();
    let waited = started.elapsed();

    assert!(matches!(
        err,
        SearchError::SuccessorTimeout { elapsed, .. } if elapsed >= Duration::from_millis(20)
    ));
    // The stalled call is abandoned near the limit, not awaited
    assert!(waited < Duration::from_millis(500), "waited {waited:?}");
    assert!(!search.graph().is_expanded(search.graph().root()));
    assert_eq!(search.graph().len(), 1);
}

#[test]
fn test_cancel_during_timed_expansion() {
    let config = MctsConfig::for_testing().with_successor_timeout(Duration::from_secs(30));
    let token = CancellationToken::new();
    let mut search = MctsPathSearch::new(
        Broken {
            sleep: Some(Duration::from_millis(1500)),
        },
        PathLengthEvaluator,
        ucb(),
        uniform(),
        config,
    )
    .with_cancellation(token.clone());
    search.next_event().unwrap();

    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        token.cancel();
    });
    let started = Instant::now();
    let err = search.next_event().unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, SearchError::Cancelled));
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(!search.graph().is_expanded(search.graph().root()));
}

#[test]
fn test_timed_expansion_within_limit() {
    let config = MctsConfig::for_testing().with_successor_timeout(Duration::from_secs(5));
    let mut search = MctsPathSearch::new(
        Broken {
            sleep: Some(Duration::from_millis(1)),
        },
        PathLengthEvaluator,
        ucb(),
        uniform(),
        config,
    );
    let summary = search.run().unwrap();
    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 1);
}

// =============================================================================
// Evaluation failures
// =============================================================================

#[test]
fn test_failed_evaluation_uses_penalty() {
    let evaluator = FnEvaluator::new(|path: &SearchPath<Vec<u8>, u8>| {
        if path.head().iter().all(|b| *b == 0) {
            Err(EvaluationError::Failed("model crashed".into()))
        } else {
            Ok(path.head().iter().map(|b| *b as f64).sum())
        }
    });
    let config = MctsConfig::for_testing().with_failure_penalty(500.0);
    let mut search =
        MctsPathSearch::new(BinaryTree { depth: 3 }, evaluator, ucb(), uniform(), config);
    let summary = search.run().unwrap();

    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 7);
    assert_eq!(summary.stats.failed_evaluations, 1);
    assert_eq!(summary.stats.evaluations, 8);

    let zeros = SearchPath::new(
        vec![vec![], vec![0], vec![0, 0], vec![0, 0, 0]],
        vec![0, 0, 0],
    )
    .unwrap();
    assert_eq!(search.cached_score(&zeros), Some(500.0));
    assert!(search
        .found_solutions()
        .iter()
        .all(|s| s.path != zeros && s.score < 500.0));
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancelled_search() {
    let token = CancellationToken::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(3, &calls).with_cancellation(token.clone());

    assert_eq!(search.next_event().unwrap(), SearchStep::Initialized);
    token.cancel();
    assert!(matches!(search.next_event(), Err(SearchError::Cancelled)));
    assert!(matches!(search.next_event(), Err(SearchError::Terminated)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_timed_out_search() {
    let token = CancellationToken::with_timeout(Duration::ZERO);
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(3, &calls).with_cancellation(token);

    search.next_event().unwrap();
    assert!(matches!(search.next_event(), Err(SearchError::TimedOut)));
}

#[test]
fn test_spurious_interrupt_is_ignored() {
    let token = CancellationToken::new();
    token.interrupt();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(2, &calls).with_cancellation(token.clone());

    let summary = search.run().unwrap();
    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 4);
    assert!(!token.is_interrupted());
}

#[test]
fn test_interrupted_evaluation_is_retried() {
    let token = CancellationToken::new();
    let interrupter = token.clone();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    // The first call is interrupted without a cancellation behind it
    let evaluator = FnEvaluator::new(move |_: &SearchPath<Vec<u8>, u8>| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            interrupter.interrupt();
            return Err(EvaluationError::Interrupted);
        }
        Ok(1.0)
    });
    let mut search = MctsPathSearch::new(
        BinaryTree { depth: 1 },
        evaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    )
    .with_cancellation(token);

    let summary = search.run().unwrap();
    assert_eq!(summary.solutions, 2);
    assert_eq!(summary.stats.failed_evaluations, 0);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Prefix enforcement
// =============================================================================

#[test]
fn test_enforced_prefix_restricts_search() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(3, &calls);
    let prefix = SearchPath::new(vec![vec![], vec![1]], vec![1]).unwrap();
    search.enforce_prefix_path(prefix).unwrap();

    let summary = search.run().unwrap();
    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 4);
    assert!(search
        .found_solutions()
        .iter()
        .all(|s| s.path.nodes()[1] == vec![1]));
    assert_eq!(summary.best.unwrap().path.head().as_slice(), TARGET);
}

#[test]
fn test_prefix_must_start_at_root() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut search = binary_search(3, &calls);
    let prefix = SearchPath::new(vec![vec![0], vec![0, 1]], vec![1]).unwrap();
    let err = search.enforce_prefix_path(prefix).unwrap_err();
    assert!(matches!(err, SearchError::InvalidPrefix(_)));
}

#[test]
fn test_conflicting_prefix_attaches_nothing() {
    // 0 -a-> 1 -b-> 0 and then 'a' again, but towards 2
    let generator = Table {
        arcs: vec![(0, 0, 1), (1, 1, 0), (0, 2, 2)],
        goals: vec![2],
    };
    let mut search = MctsPathSearch::new(
        generator,
        PathLengthEvaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    );
    let prefix = SearchPath::new(vec![0, 1, 0, 2], vec![0, 1, 0]).unwrap();
    let err = search.enforce_prefix_path(prefix).unwrap_err();

    assert!(matches!(
        err,
        SearchError::Graph(GraphError::DuplicateAction { ref state, .. }) if state == "0"
    ));
    let graph = search.graph();
    assert_eq!(graph.len(), 1);
    assert!(graph.successors(graph.root()).is_empty());
    assert!(!graph.is_expanded(graph.root()));
    assert_eq!(graph.unexpanded_count(), 1);
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn test_event_sink_receives_notifications() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(RecordingSink::<Vec<u8>>::new());
    let mut search = binary_search(3, &calls).with_event_sink(sink.clone());
    let summary = search.run().unwrap();

    assert_eq!(sink.count("graph_initialized"), 1);
    // every node but the root is added once
    assert_eq!(sink.count("node_added"), 14);
    let playouts_with_paths = summary.stats.evaluations + summary.stats.cache_hits;
    assert_eq!(sink.count("rollout_observed") as u64, playouts_with_paths);
    assert!(sink.count("node_state_switch") > 0);
}

#[test]
fn test_failed_evaluation_event() {
    let sink = Arc::new(RecordingSink::<Vec<u8>>::new());
    let evaluator =
        FnEvaluator::new(|_: &SearchPath<Vec<u8>, u8>| Err(EvaluationError::Failed("nope".into())));
    let mut search = MctsPathSearch::new(
        BinaryTree { depth: 1 },
        evaluator,
        ucb(),
        uniform(),
        MctsConfig::for_testing(),
    )
    .with_event_sink(sink.clone());
    let summary = search.run().unwrap();

    assert_eq!(summary.solutions, 0);
    assert!(summary.best.is_none());
    let failures = sink
        .events()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                SearchEvent::NodeStateSwitch {
                    state: NodeState::EvaluationFailed,
                    ..
                }
            )
        })
        .count();
    assert_eq!(failures, 2);
}

// =============================================================================
// Other tree policies
// =============================================================================

#[test]
fn test_plackett_luce_search() {
    let calls = Arc::new(AtomicUsize::new(0));
    let policy: Box<dyn TreePolicy<Vec<u8>, u8>> = Box::new(PlackettLucePolicy::with_bootstrapping(
        PlackettLuceConfig::default().with_seed(3),
        BootstrapConfig::default().with_min_observations(1),
    ));
    let mut search = MctsPathSearch::new(
        BinaryTree { depth: 4 },
        target_evaluator(&calls),
        policy,
        uniform(),
        MctsConfig::for_testing(),
    );
    let summary = search.run().unwrap();

    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 16);
    assert_eq!(calls.load(Ordering::SeqCst), 16);
}

#[test]
fn test_ensemble_search() {
    let calls = Arc::new(AtomicUsize::new(0));
    let members: Vec<Box<dyn TreePolicy<Vec<u8>, u8>>> = vec![
        ucb(),
        Box::new(PlackettLucePolicy::with_bootstrapping(
            PlackettLuceConfig::default(),
            BootstrapConfig::default(),
        )),
        Box::new(UniformRandomPolicy::new(1)),
    ];
    let ensemble = EnsemblePolicy::new(members, MemberSelection::Random, 9).unwrap();
    let summary = run_path_search(
        BinaryTree { depth: 3 },
        target_evaluator(&calls),
        Box::new(ensemble),
        uniform(),
        MctsConfig::for_testing(),
        CancellationToken::new(),
    )
    .unwrap();

    assert!(summary.exhausted);
    assert_eq!(summary.solutions, 8);
    assert_eq!(summary.best.unwrap().score, 0.0);
}
