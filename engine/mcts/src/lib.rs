//! Monte Carlo Tree Search (MCTS) over implicit graphs.
//!
//! This crate searches the graph described by any
//! [`GraphGenerator`](search_core::GraphGenerator) for goal paths, scoring
//! each complete path with a [`PathEvaluator`]. Scores are costs: lower is
//! better.
//!
//! # Overview
//!
//! Every playout consists of four phases:
//!
//! 1. **Selection**: Descend through the explored graph with a tree policy
//!    (UCB family, Plackett-Luce, an ensemble, or uniform)
//! 2. **Expansion**: Attach the successors of the first unexpanded node and
//!    let the default policy pick a child that was never tried
//! 3. **Simulation**: Follow random successors until the goal test holds,
//!    without attaching anything to the graph
//! 4. **Backpropagation**: Score the path (at most once per distinct path)
//!    and update the tree policy with the attached prefix
//!
//! Nodes whose subgraph is completely explored are pruned from selection.
//! Once the root is fully explored the search reports exhaustion.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{MctsConfig, MctsPathSearch, PathLengthEvaluator};
//! use mcts::{UcbConfig, UcbPolicy, UniformRandomPolicy};
//!
//! let mut search = MctsPathSearch::new(
//!     generator,
//!     PathLengthEvaluator,
//!     Box::new(UcbPolicy::new(&UcbConfig::default())),
//!     Box::new(UniformRandomPolicy::new(7)),
//!     MctsConfig::default(),
//! );
//!
//! for solution in search.solutions() {
//!     let solution = solution?;
//!     println!("{:?} scored {}", solution.path, solution.score);
//! }
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls the engine:
//!
//! - `seed`: Seed of the simulation random stream
//! - `failure_penalty`: Score recorded when evaluation fails (default: 1e6)
//! - `successor_timeout`: Upper bound for one successor generation call
//! - `max_solutions`: Stop [`MctsPathSearch::run`] after this many solutions
//!
//! Policies carry their own configuration ([`UcbConfig`],
//! [`PlackettLuceConfig`], [`BootstrapConfig`]) and random streams.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       MctsPathSearch                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────────┐ │
//! │  │ExploredGraph│  │GraphGenerator│  │   PathEvaluator     │ │
//! │  │  (arena)    │  │ (implicit)   │  │ (cached by path)    │ │
//! │  └──────┬──────┘  └──────┬───────┘  └──────────┬──────────┘ │
//! │         │                │                     │            │
//! │         ▼                ▼                     ▼            │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │   select → expand → simulate → evaluate → update      │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod evaluator;
pub mod graph;
pub mod node;
pub mod pl;
pub mod policy;
pub mod preference;
pub mod search;

// Re-export main types
pub use config::{
    BootstrapConfig, ConfigError, MctsConfig, PlackettLuceConfig, UcbConfig, UtilityKind,
};
pub use evaluator::{EvaluationError, FnEvaluator, PathEvaluator, PathLengthEvaluator};
pub use graph::{ExploredGraph, GraphError, GraphStats};
pub use node::{GraphNode, NodeId};
pub use pl::{MmEstimator, PlInferenceProblem, PlProblemEncoder};
pub use policy::{
    CombinedGamma, CosLinGamma, EnsemblePolicy, GammaFunction, MemberSelection, NegatedMean,
    PlackettLucePolicy, Policy, PolicyContext, PolicyError, PolicyKey, SortedObservations,
    TreePolicy, UcbPolicy, UcbUtility, UniformRandomPolicy, ValueAtRisk,
};
pub use preference::{BootstrapStatistic, BootstrappingPreferenceKernel, PreferenceKernel};
pub use search::{
    run_path_search, MctsPathSearch, SearchError, SearchStats, SearchStep, SearchSummary,
    Solutions,
};
