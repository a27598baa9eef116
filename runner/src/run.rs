//! Builds the selected graph and drives the search to its end.

use anyhow::Result;
use graphs_synthetic::{Choice, SubsetState, SubsetSum, UniformTree};
use mcts::{
    EvaluationError, FnEvaluator, MctsPathSearch, PathEvaluator, PolicyKey, SearchError,
};
use search_core::{CancellationToken, EvaluatedPath, GraphGenerator, SearchPath, TracingSink};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Config, GraphKind};
use crate::policies::SearchSettings;
use crate::report::{Outcome, Report, SolutionRecord};

/// Run the search described by `config` until exhaustion, the solution
/// limit, cancellation or the time budget.
pub fn execute(config: &Config, settings: &SearchSettings, token: CancellationToken) -> Result<Report> {
    match config.graph {
        GraphKind::UniformTree => {
            let tree = UniformTree::new(config.branching, config.depth).with_cost_seed(config.seed);
            info!(
                branching = config.branching,
                depth = config.depth,
                leaves = tree.leaf_count(),
                "Searching uniform tree"
            );
            let costs = tree.clone();
            let evaluator = FnEvaluator::new(
                move |path: &SearchPath<Vec<u32>, u32>| -> Result<f64, EvaluationError> {
                    Ok(costs.cost(path))
                },
            );
            drive(config, settings, tree, evaluator, token, |path| {
                path.arcs().iter().map(|choice| choice.to_string()).collect()
            })
        }
        GraphKind::SubsetSum => {
            let problem = SubsetSum::random(config.items, config.max_weight, config.seed);
            info!(
                items = config.items,
                target = problem.target(),
                "Searching subset-sum DAG"
            );
            let gaps = problem.clone();
            let evaluator = FnEvaluator::new(
                move |path: &SearchPath<SubsetState, Choice>| -> Result<f64, EvaluationError> {
                    Ok(gaps.gap(path))
                },
            );
            let weights = problem.weights().to_vec();
            drive(config, settings, problem, evaluator, token, move |path| {
                SubsetSum::taken(path)
                    .into_iter()
                    .map(|index| format!("#{index}:{}", weights[index]))
                    .collect()
            })
        }
    }
}

fn drive<N, A, G, E>(
    config: &Config,
    settings: &SearchSettings,
    generator: G,
    evaluator: E,
    token: CancellationToken,
    describe: impl Fn(&SearchPath<N, A>) -> Vec<String>,
) -> Result<Report>
where
    N: PolicyKey + 'static,
    A: PolicyKey + 'static,
    G: GraphGenerator<State = N, Action = A> + Send + Sync + 'static,
    E: PathEvaluator<N, A>,
{
    let record = |solution: &EvaluatedPath<N, A>| SolutionRecord {
        score: solution.score,
        depth: solution.path.depth(),
        actions: describe(&solution.path),
    };

    let mut search = MctsPathSearch::new(
        generator,
        evaluator,
        settings.tree_policy()?,
        settings.default_policy()?,
        settings.engine.clone(),
    )
    .with_cancellation(token)
    .with_event_sink(Arc::new(TracingSink));

    let started = Instant::now();
    let limit = settings.engine.max_solutions;
    let mut outcome = Outcome::Exhausted;
    let mut found = 0usize;
    for solution in search.solutions() {
        match solution {
            Ok(solution) => {
                found += 1;
                debug!(score = solution.score, depth = solution.path.depth(), "Solution");
            }
            Err(SearchError::Cancelled) => {
                outcome = Outcome::Cancelled;
                break;
            }
            Err(SearchError::TimedOut) => {
                outcome = Outcome::TimedOut;
                break;
            }
            Err(e) => return Err(e.into()),
        }
        if limit.is_some_and(|max| found >= max) {
            outcome = Outcome::SolutionLimit;
            break;
        }
    }
    let runtime = started.elapsed();

    let stats = search.stats();
    match outcome {
        Outcome::Cancelled | Outcome::TimedOut => warn!(
            ?outcome,
            solutions = stats.solutions,
            "Search stopped early, reporting partial results"
        ),
        _ => info!(
            ?outcome,
            solutions = stats.solutions,
            playouts = stats.playouts,
            elapsed_ms = runtime.as_millis() as u64,
            "Search finished"
        ),
    }

    Ok(Report {
        graph: graph_name(config.graph).to_string(),
        tree_policy: settings.tree_policy.clone(),
        default_policy: settings.default_policy.clone(),
        seed: settings.seed,
        outcome,
        runtime_seconds: runtime.as_secs_f64(),
        best: search.best_solution().map(record),
        stats: stats.into(),
        solutions: if config.all_solutions {
            search.found_solutions().iter().map(record).collect()
        } else {
            Vec::new()
        },
    })
}

fn graph_name(kind: GraphKind) -> &'static str {
    match kind {
        GraphKind::UniformTree => "uniform-tree",
        GraphKind::SubsetSum => "subset-sum",
    }
}
