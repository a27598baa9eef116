//! MCTS path search implementation.
//!
//! Every iteration builds one playout from the root (or the head of an
//! enforced prefix) to a goal:
//! 1. Selection: descend through the explored graph with the tree policy
//! 2. Expansion: attach the successors of the first unexpanded node and let
//!    the default policy pick an untried child
//! 3. Simulation: walk random successors until the goal test holds; these
//!    nodes are never attached
//! 4. Evaluation and backpropagation: score the path (once per distinct path)
//!    and feed the score of the attached prefix to the tree policy
//!
//! The engine is a resumable result stream: [`MctsPathSearch::next_event`]
//! returns whenever a new solution is found and once the graph is exhausted.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use search_core::{
    CancellationToken, EvaluatedPath, EventSink, GenerationError, GraphGenerator, Interruption,
    NodeState, SearchEvent, SearchPath, Successor,
};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::config::MctsConfig;
use crate::evaluator::{EvaluationError, PathEvaluator};
use crate::graph::{ExploredGraph, GraphError};
use crate::node::NodeId;
use crate::policy::{Policy, PolicyContext, PolicyError, PolicyKey, TreePolicy};

/// How often the cancellation token is polled while waiting on a timed
/// successor generation call.
const TOKEN_POLL_INTERVAL: Duration = Duration::from_millis(5);

type Generated<N, A> = Result<Vec<Successor<N, A>>, GenerationError>;

/// Errors that terminate a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search was cancelled")]
    Cancelled,

    #[error("Search ran out of time")]
    TimedOut,

    #[error("Successor generation failed for {state}")]
    SuccessorGeneration {
        state: String,
        #[source]
        source: GenerationError,
    },

    #[error("Successor generation for {state} took {elapsed:?}, above the configured limit")]
    SuccessorTimeout { state: String, elapsed: Duration },

    #[error("Expected a successor of non-goal state {state} during simulation, found none")]
    MissingSuccessor { state: String },

    #[error("Explored graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Policy could not choose an action at {state}")]
    ActionPrediction {
        state: String,
        #[source]
        source: PolicyError,
    },

    #[error("Policy chose action {action} which is not a candidate at {state}")]
    UnknownAction { state: String, action: String },

    #[error("Invalid prefix path: {0}")]
    InvalidPrefix(String),

    #[error("Search has already terminated with an error")]
    Terminated,
}

impl From<Interruption> for SearchError {
    fn from(value: Interruption) -> Self {
        match value {
            Interruption::Cancelled => SearchError::Cancelled,
            Interruption::TimedOut => SearchError::TimedOut,
        }
    }
}

/// One item of the result stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStep<N, A> {
    /// First call: the graph holds the root and the search is active
    Initialized,
    /// A goal path that was not seen before, with its score
    Solution(EvaluatedPath<N, A>),
    /// Every reachable path has been explored; repeated calls return this again
    Exhausted,
}

/// Counters of a running search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub playouts: u64,
    /// Playouts abandoned and started over from the top
    pub restarts: u64,
    /// Calls into the path evaluator
    pub evaluations: u64,
    pub failed_evaluations: u64,
    pub cache_hits: u64,
    pub solutions: u64,
    pub nodes: usize,
    pub unexpanded: usize,
}

/// Outcome of [`MctsPathSearch::run`].
#[derive(Debug, Clone)]
pub struct SearchSummary<N, A> {
    pub best: Option<EvaluatedPath<N, A>>,
    pub solutions: usize,
    /// False when the run stopped at `max_solutions`
    pub exhausted: bool,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Active,
    Exhausted,
    Failed,
}

enum Playout<N, A> {
    /// Goal path; the first `attached_len` nodes are in the explored graph
    Path {
        path: SearchPath<N, A>,
        attached_len: usize,
    },
    /// Start over from the top
    Restart,
    /// Nothing is left to explore below the start node
    Exhausted,
}

/// MCTS search over the implicit graph of a generator.
pub struct MctsPathSearch<N, A, G, E> {
    /// Shared with the worker thread of a timed expansion
    generator: Arc<G>,
    evaluator: E,
    tree_policy: Box<dyn TreePolicy<N, A>>,
    default_policy: Box<dyn Policy<N, A>>,
    config: MctsConfig,
    graph: ExploredGraph<N, A>,
    rng: ChaCha20Rng,
    token: CancellationToken,
    sink: Option<Arc<dyn EventSink<N>>>,
    phase: Phase,
    /// Path from the root to the node every playout starts at
    start_path: SearchPath<N, A>,
    start: NodeId,
    cache: HashMap<SearchPath<N, A>, f64>,
    solutions: Vec<EvaluatedPath<N, A>>,
    best: Option<usize>,
    stats: SearchStats,
}

impl<N, A, G, E> MctsPathSearch<N, A, G, E>
where
    N: PolicyKey + 'static,
    A: PolicyKey + 'static,
    G: GraphGenerator<State = N, Action = A> + Send + Sync + 'static,
    E: PathEvaluator<N, A>,
{
    pub fn new(
        generator: G,
        evaluator: E,
        tree_policy: Box<dyn TreePolicy<N, A>>,
        default_policy: Box<dyn Policy<N, A>>,
        config: MctsConfig,
    ) -> Self {
        let root = generator.root();
        let graph = ExploredGraph::new(root.clone());
        let start = graph.root();
        Self {
            rng: ChaCha20Rng::seed_from_u64(config.seed),
            generator: Arc::new(generator),
            evaluator,
            tree_policy,
            default_policy,
            config,
            graph,
            token: CancellationToken::new(),
            sink: None,
            phase: Phase::Created,
            start_path: SearchPath::root_only(root),
            start,
            cache: HashMap::new(),
            solutions: Vec::new(),
            best: None,
            stats: SearchStats::default(),
        }
    }

    /// Share a cancellation token with the caller.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink<N>>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn graph(&self) -> &ExploredGraph<N, A> {
        &self.graph
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            nodes: self.graph.len(),
            unexpanded: self.graph.unexpanded_count(),
            ..self.stats
        }
    }

    /// Lowest-scored solution so far
    pub fn best_solution(&self) -> Option<&EvaluatedPath<N, A>> {
        self.best.and_then(|idx| self.solutions.get(idx))
    }

    /// Solutions in the order they were found
    pub fn found_solutions(&self) -> &[EvaluatedPath<N, A>] {
        &self.solutions
    }

    pub fn cached_score(&self, path: &SearchPath<N, A>) -> Option<f64> {
        self.cache.get(path).copied()
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    /// Force every playout to start with `prefix`.
    ///
    /// The prefix must start at the generator's root. Its arcs are attached to
    /// the explored graph and every node but the head is treated as expanded,
    /// so the search only explores below the head.
    pub fn enforce_prefix_path(&mut self, prefix: SearchPath<N, A>) -> Result<(), SearchError> {
        if *prefix.root() != *self.graph.state(self.graph.root()) {
            return Err(SearchError::InvalidPrefix(format!(
                "{prefix:?} does not start at the root {:?}",
                self.graph.state(self.graph.root())
            )));
        }

        self.graph.check_arcs(&prefix)?;

        let mut current = self.graph.root();
        for (action, next) in prefix.arcs().iter().zip(prefix.nodes().iter().skip(1)) {
            let is_new = !self.graph.contains(next);
            let child = self.graph.add_arc(current, action.clone(), next.clone())?;
            if is_new {
                let parent = self.graph.state(current).clone();
                self.emit(|| SearchEvent::NodeAdded {
                    parent,
                    child: next.clone(),
                });
            }
            self.graph.mark_expanded(current);
            self.graph.mark_visited(child);
            current = child;
        }

        debug!(prefix = ?prefix, "Enforcing prefix path");
        self.start = current;
        self.start_path = prefix;
        Ok(())
    }

    /// Advance the search to its next event.
    ///
    /// After exhaustion every call returns `Exhausted` again. After an error
    /// every call returns [`SearchError::Terminated`].
    pub fn next_event(&mut self) -> Result<SearchStep<N, A>, SearchError> {
        match self.phase {
            Phase::Created => {
                let root = self.graph.state(self.graph.root()).clone();
                info!(
                    root = ?root,
                    tree_policy = self.tree_policy.name(),
                    default_policy = self.default_policy.name(),
                    seed = self.config.seed,
                    "Starting MCTS path search"
                );
                self.emit(|| SearchEvent::GraphInitialized { root });
                self.phase = Phase::Active;
                return Ok(SearchStep::Initialized);
            }
            Phase::Exhausted => return Ok(SearchStep::Exhausted),
            Phase::Failed => return Err(SearchError::Terminated),
            Phase::Active => {}
        }

        match self.advance() {
            Ok(SearchStep::Exhausted) => {
                let stats = self.stats();
                info!(
                    playouts = stats.playouts,
                    solutions = stats.solutions,
                    nodes = stats.nodes,
                    cache_hits = stats.cache_hits,
                    "Search space exhausted"
                );
                self.phase = Phase::Exhausted;
                Ok(SearchStep::Exhausted)
            }
            Ok(step) => Ok(step),
            Err(e) => {
                match &e {
                    SearchError::Cancelled | SearchError::TimedOut => {
                        info!(reason = %e, "Search stopped")
                    }
                    _ => error!(error = %e, "Search failed"),
                }
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    /// Drive the search until it is exhausted or `max_solutions` is reached.
    pub fn run(&mut self) -> Result<SearchSummary<N, A>, SearchError> {
        let started = Instant::now();
        let exhausted = loop {
            match self.next_event()? {
                SearchStep::Initialized => {}
                SearchStep::Solution(_) => {
                    if let Some(max) = self.config.max_solutions {
                        if self.solutions.len() >= max {
                            debug!(max, "Solution limit reached");
                            break false;
                        }
                    }
                }
                SearchStep::Exhausted => break true,
            }
        };
        Ok(SearchSummary {
            best: self.best_solution().cloned(),
            solutions: self.solutions.len(),
            exhausted,
            stats: self.stats(),
            elapsed: started.elapsed(),
        })
    }

    /// Iterate over newly found solutions until exhaustion or the first error.
    pub fn solutions(&mut self) -> Solutions<'_, N, A, G, E> {
        Solutions {
            search: self,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<SearchStep<N, A>, SearchError> {
        loop {
            if self.token.is_interrupted() {
                self.token.resolve_interrupt()?;
                debug!("Ignoring interrupt without cancellation");
            }
            self.token.check()?;

            if self.graph.unexpanded_count() == 0
                || self.graph.is_fully_explored(self.graph.root())
                || self.graph.is_fully_explored(self.start)
            {
                return Ok(SearchStep::Exhausted);
            }

            self.stats.playouts += 1;
            match self.build_playout()? {
                Playout::Restart => {
                    self.stats.restarts += 1;
                    trace!("Restarting playout");
                }
                Playout::Exhausted => return Ok(SearchStep::Exhausted),
                Playout::Path { path, attached_len } => {
                    if let Some(solution) = self.evaluate_playout(path, attached_len)? {
                        return Ok(SearchStep::Solution(solution));
                    }
                }
            }
        }
    }

    fn build_playout(&mut self) -> Result<Playout<N, A>, SearchError> {
        let mut path = self.start_path.clone();
        let mut current = self.start;
        self.switch_state(current, NodeState::Rollout);

        if self.generator.is_goal(&path) {
            self.graph.mark_fully_explored(current);
            let attached_len = path.len();
            return Ok(Playout::Path { path, attached_len });
        }

        // Selection
        while self.graph.is_expanded(current) && self.graph.all_children_visited(current) {
            let candidates = self.open_children(current, |_| true);
            if candidates.is_empty() {
                let marked = self.graph.mark_fully_explored(current);
                debug!(
                    node = ?self.graph.state(current),
                    propagated = marked.len(),
                    "No open children left"
                );
                if current == self.start {
                    return Ok(Playout::Exhausted);
                }
                return Ok(Playout::Restart);
            }

            let ctx = PolicyContext::new(&self.graph);
            let state = self.graph.state(current);
            let action = self
                .tree_policy
                .choose_action(&ctx, state, &candidates)
                .map_err(|source| SearchError::ActionPrediction {
                    state: format!("{state:?}"),
                    source,
                })?;
            let child = self.candidate_child(current, &candidates, &action)?;

            path.push(action, self.graph.state(child).clone());
            current = child;
            self.switch_state(current, NodeState::Rollout);

            if self.generator.is_goal(&path) {
                self.graph.mark_fully_explored(current);
                trace!(depth = path.depth(), "Selection reached a goal");
                let attached_len = path.len();
                return Ok(Playout::Path { path, attached_len });
            }
        }

        // Expansion
        if !self.graph.is_expanded(current) && !self.expand_node(current)? {
            return Ok(Playout::Restart);
        }
        let untried = self.open_children(current, |visited| !visited);
        if untried.is_empty() {
            let closed = self
                .graph
                .successors(current)
                .iter()
                .all(|(_, child)| self.graph.is_fully_explored(*child));
            if closed {
                // Dead end, or every child was already finished through another parent
                self.graph.mark_fully_explored(current);
                debug!(node = ?self.graph.state(current), "Nothing left to try below node");
                if current == self.start {
                    return Ok(Playout::Exhausted);
                }
            }
            return Ok(Playout::Restart);
        }

        let ctx = PolicyContext::new(&self.graph);
        let state = self.graph.state(current);
        let action = self
            .default_policy
            .choose_action(&ctx, state, &untried)
            .map_err(|source| SearchError::ActionPrediction {
                state: format!("{state:?}"),
                source,
            })?;
        let child = self.candidate_child(current, &untried, &action)?;
        self.graph.mark_visited(child);
        path.push(action, self.graph.state(child).clone());
        self.switch_state(child, NodeState::Rollout);

        let attached_len = path.len();
        if self.generator.is_goal(&path) {
            self.graph.mark_fully_explored(child);
            return Ok(Playout::Path { path, attached_len });
        }

        // Simulation
        let mut first_step = true;
        while !self.generator.is_goal(&path) {
            self.token.check()?;
            match self.generator.random_successor(path.head(), &mut self.rng) {
                Ok(successor) => {
                    path.push(successor.action, successor.to);
                    first_step = false;
                }
                Err(GenerationError::NoSuccessor) if first_step => {
                    // The freshly attached child is a dead end
                    if !self.graph.is_expanded(child) {
                        self.graph.attach_successors(child, Vec::new())?;
                    }
                    self.graph.mark_fully_explored(child);
                    debug!(node = ?self.graph.state(child), "Dead end below the frontier");
                    return Ok(Playout::Restart);
                }
                Err(GenerationError::NoSuccessor) => {
                    return Err(SearchError::MissingSuccessor {
                        state: format!("{:?}", path.head()),
                    });
                }
                Err(GenerationError::Interrupted) => {
                    self.token.resolve_interrupt()?;
                }
                Err(source) => {
                    return Err(SearchError::SuccessorGeneration {
                        state: format!("{:?}", path.head()),
                        source,
                    });
                }
            }
        }

        self.graph.path_ids(&path.prefix(attached_len))?;
        trace!(depth = path.depth(), attached_len, "Playout complete");
        Ok(Playout::Path { path, attached_len })
    }

    /// `(action, state)` of the children of `id` that are not fully explored
    /// and whose visited flag passes `keep`.
    fn open_children(&self, id: NodeId, keep: impl Fn(bool) -> bool) -> Vec<(A, N)> {
        self.graph
            .successors(id)
            .iter()
            .filter(|(_, child)| {
                !self.graph.is_fully_explored(*child) && keep(self.graph.is_visited(*child))
            })
            .map(|(action, child)| (action.clone(), self.graph.state(*child).clone()))
            .collect()
    }

    fn candidate_child(
        &self,
        parent: NodeId,
        candidates: &[(A, N)],
        action: &A,
    ) -> Result<NodeId, SearchError> {
        let unknown = || SearchError::UnknownAction {
            state: format!("{:?}", self.graph.state(parent)),
            action: format!("{action:?}"),
        };
        if !candidates.iter().any(|(a, _)| a == action) {
            return Err(unknown());
        }
        self.graph
            .get(parent)
            .child_by_action(action)
            .ok_or_else(unknown)
    }

    /// Attach the successors of `id`. `Ok(false)` asks for a new playout after
    /// an interrupt that was not backed by a cancellation.
    fn expand_node(&mut self, id: NodeId) -> Result<bool, SearchError> {
        self.token.check()?;
        let state = self.graph.state(id).clone();
        let started = Instant::now();
        let generated = match self.config.successor_timeout {
            Some(limit) => self.successors_within(&state, limit)?,
            None => self.generator.successors(&state),
        };
        let elapsed = started.elapsed();

        let successors = match generated {
            Ok(successors) => successors,
            Err(GenerationError::NoSuccessor) => Vec::new(),
            Err(GenerationError::Interrupted) => {
                self.token.resolve_interrupt()?;
                debug!(node = ?state, "Expansion interrupted, retrying");
                return Ok(false);
            }
            Err(source) => {
                return Err(SearchError::SuccessorGeneration {
                    state: format!("{state:?}"),
                    source,
                });
            }
        };
        self.token.check()?;

        if elapsed > self.config.slow_expansion_warn {
            warn!(
                node = ?state,
                elapsed_ms = elapsed.as_millis() as u64,
                successors = successors.len(),
                "Slow successor generation"
            );
        }

        let children = self.graph.attach_successors(id, successors)?;
        trace!(node = ?state, children = children.len(), "Expanded node");
        for (child, is_new) in children {
            if is_new {
                let child = self.graph.state(child).clone();
                let parent = state.clone();
                self.emit(|| SearchEvent::NodeAdded { parent, child });
            }
        }
        Ok(true)
    }

    /// Generate the successors of `state` on a worker thread and give up
    /// waiting after `limit`.
    ///
    /// An overrunning generator keeps running detached and its result is
    /// dropped. The token is polled while waiting, so cancellation and the
    /// search deadline still apply during the call.
    fn successors_within(
        &self,
        state: &N,
        limit: Duration,
    ) -> Result<Generated<N, A>, SearchError> {
        let (tx, rx) = mpsc::channel();
        let generator = Arc::clone(&self.generator);
        let owned = state.clone();
        thread::Builder::new()
            .name("successor-generation".into())
            .spawn(move || {
                // The receiver is gone once the search stopped waiting
                let _ = tx.send(generator.successors(&owned));
            })
            .map_err(|e| SearchError::SuccessorGeneration {
                state: format!("{state:?}"),
                source: GenerationError::Failed(format!("could not start worker: {e}")),
            })?;

        let started = Instant::now();
        loop {
            let remaining = limit.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                let elapsed = started.elapsed();
                warn!(
                    node = ?state,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Successor generation timed out"
                );
                return Err(SearchError::SuccessorTimeout {
                    state: format!("{state:?}"),
                    elapsed,
                });
            }
            match rx.recv_timeout(remaining.min(TOKEN_POLL_INTERVAL)) {
                Ok(generated) => return Ok(generated),
                Err(RecvTimeoutError::Timeout) => self.token.check()?,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SearchError::SuccessorGeneration {
                        state: format!("{state:?}"),
                        source: GenerationError::Failed("worker panicked".into()),
                    });
                }
            }
        }
    }

    fn evaluate_playout(
        &mut self,
        path: SearchPath<N, A>,
        attached_len: usize,
    ) -> Result<Option<EvaluatedPath<N, A>>, SearchError> {
        let tree_path = path.prefix(attached_len);

        if let Some(score) = self.cached_score(&path) {
            self.stats.cache_hits += 1;
            if self.config.log_repeated_paths_as_warnings {
                warn!(path = ?path, score, "Path drawn again, using cached score");
            } else {
                debug!(path = ?path, score, "Path drawn again, using cached score");
            }
            self.emit(|| SearchEvent::RolloutObserved {
                nodes: path.nodes().to_vec(),
                score,
            });
            self.tree_policy.update_path(&tree_path, score);
            return Ok(None);
        }

        let outcome = loop {
            self.token.check()?;
            match self.evaluator.evaluate(&path) {
                Ok(score) => break Ok(score),
                Err(EvaluationError::Interrupted) => {
                    self.token.resolve_interrupt()?;
                    debug!("Evaluation interrupted, retrying");
                }
                Err(EvaluationError::Failed(reason)) => break Err(reason),
            }
        };
        self.stats.evaluations += 1;

        let score = match outcome {
            Ok(score) => score,
            Err(reason) => {
                let penalty = self.config.failure_penalty;
                self.stats.failed_evaluations += 1;
                warn!(path = ?path, reason = %reason, penalty, "Evaluation failed, using penalty");
                self.cache.insert(path.clone(), penalty);
                self.emit(|| SearchEvent::RolloutObserved {
                    nodes: path.nodes().to_vec(),
                    score: penalty,
                });
                let head = path.head().clone();
                self.emit(|| SearchEvent::NodeStateSwitch {
                    node: head,
                    state: NodeState::EvaluationFailed,
                });
                self.tree_policy.update_path(&tree_path, penalty);
                return Ok(None);
            }
        };

        self.cache.insert(path.clone(), score);
        self.emit(|| SearchEvent::RolloutObserved {
            nodes: path.nodes().to_vec(),
            score,
        });
        self.tree_policy.update_path(&tree_path, score);

        let improves = self.best_solution().map_or(true, |best| score < best.score);
        self.solutions.push(EvaluatedPath::new(path.clone(), score));
        self.stats.solutions += 1;
        if improves {
            self.best = Some(self.solutions.len() - 1);
            info!(score, depth = path.depth(), "New best solution");
        } else {
            debug!(score, depth = path.depth(), "New solution");
        }
        Ok(Some(EvaluatedPath::new(path, score)))
    }

    fn switch_state(&self, id: NodeId, state: NodeState) {
        if self.sink.is_some() {
            let node = self.graph.state(id).clone();
            self.emit(|| SearchEvent::NodeStateSwitch { node, state });
        }
    }

    fn emit(&self, event: impl FnOnce() -> SearchEvent<N>) {
        if let Some(sink) = &self.sink {
            sink.notify(event());
        }
    }
}

/// Iterator over the solutions of a search, see [`MctsPathSearch::solutions`].
pub struct Solutions<'a, N, A, G, E> {
    search: &'a mut MctsPathSearch<N, A, G, E>,
    done: bool,
}

impl<N, A, G, E> Iterator for Solutions<'_, N, A, G, E>
where
    N: PolicyKey + 'static,
    A: PolicyKey + 'static,
    G: GraphGenerator<State = N, Action = A> + Send + Sync + 'static,
    E: PathEvaluator<N, A>,
{
    type Item = Result<EvaluatedPath<N, A>, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.search.next_event() {
                Ok(SearchStep::Initialized) => {}
                Ok(SearchStep::Solution(solution)) => return Some(Ok(solution)),
                Ok(SearchStep::Exhausted) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Convenience function to run a search to exhaustion (or `max_solutions`).
pub fn run_path_search<N, A, G, E>(
    generator: G,
    evaluator: E,
    tree_policy: Box<dyn TreePolicy<N, A>>,
    default_policy: Box<dyn Policy<N, A>>,
    config: MctsConfig,
    token: CancellationToken,
) -> Result<SearchSummary<N, A>, SearchError>
where
    N: PolicyKey + 'static,
    A: PolicyKey + 'static,
    G: GraphGenerator<State = N, Action = A> + Send + Sync + 'static,
    E: PathEvaluator<N, A>,
{
    MctsPathSearch::new(generator, evaluator, tree_policy, default_policy, config)
        .with_cancellation(token)
        .run()
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
