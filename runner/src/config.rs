//! Configuration for the runner
//!
//! Defaults come from the central config (config.toml, `PATHSEARCH_*`
//! environment overrides, built-in defaults). CLI arguments take highest
//! priority.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use once_cell::sync::Lazy;
use search_config::{load_config, CentralConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::policies::{DEFAULT_POLICIES, TREE_POLICIES};

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

/// The central configuration the CLI defaults were taken from
pub fn central() -> &'static CentralConfig {
    &CENTRAL_CONFIG
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_tree_policy() -> String {
    CENTRAL_CONFIG.search.tree_policy.clone()
}

fn default_default_policy() -> String {
    CENTRAL_CONFIG.search.default_policy.clone()
}

fn default_max_solutions() -> usize {
    CENTRAL_CONFIG.search.max_solutions
}

fn default_time_budget() -> u64 {
    CENTRAL_CONFIG.search.time_budget_secs
}

/// Synthetic graph families the runner can search
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphKind {
    /// Complete tree, random leaf costs
    UniformTree,
    /// Subset-sum DAG, cost is the gap to the target
    SubsetSum,
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "mcts-runner")]
#[command(about = "Monte Carlo tree search for goal paths in implicit graphs")]
#[command(
    long_about = "Runs the MCTS path search on a synthetic graph and prints a JSON
report with the best path found, search statistics and (optionally) every
solution in discovery order.

Configuration is loaded from config.toml with PATHSEARCH_* environment
variable overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Graph to search
    #[arg(long, value_enum, default_value_t = GraphKind::UniformTree)]
    pub graph: GraphKind,

    /// Children per inner node of the uniform tree
    #[arg(long, default_value_t = 3)]
    pub branching: u32,

    /// Depth of the uniform tree
    #[arg(long, default_value_t = 5)]
    pub depth: usize,

    /// Number of subset-sum items
    #[arg(long, default_value_t = 14)]
    pub items: usize,

    /// Largest subset-sum item weight
    #[arg(long, default_value_t = 100)]
    pub max_weight: u64,

    /// Tree policy (ucb, plackett-luce, uniform, ensemble)
    #[arg(long, default_value_t = default_tree_policy())]
    pub tree_policy: String,

    /// Default policy used on expansion (uniform)
    #[arg(long, default_value_t = default_default_policy())]
    pub default_policy: String,

    /// Seed for the engine, the policies and the instance
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Stop after this many solutions (0 to run until exhausted)
    #[arg(long, default_value_t = default_max_solutions())]
    pub max_solutions: usize,

    /// Wall-clock budget in seconds (0 for none)
    #[arg(long, default_value_t = default_time_budget())]
    pub time_budget_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Include every solution in the report
    #[arg(long)]
    pub all_solutions: bool,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<String>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        match self.graph {
            GraphKind::UniformTree => {
                if self.branching == 0 {
                    return Err(anyhow!("branching must be greater than 0"));
                }
                if self.depth == 0 {
                    return Err(anyhow!("depth must be greater than 0"));
                }
            }
            GraphKind::SubsetSum => {
                if self.items == 0 {
                    return Err(anyhow!("items must be greater than 0"));
                }
                if self.max_weight == 0 {
                    return Err(anyhow!("max_weight must be greater than 0"));
                }
            }
        }

        if !TREE_POLICIES.contains(&self.tree_policy.as_str()) {
            return Err(anyhow!(
                "unknown tree_policy '{}', expected one of {}",
                self.tree_policy,
                TREE_POLICIES.join(", ")
            ));
        }

        if !DEFAULT_POLICIES.contains(&self.default_policy.as_str()) {
            return Err(anyhow!(
                "unknown default_policy '{}', expected one of {}",
                self.default_policy,
                DEFAULT_POLICIES.join(", ")
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_secs > 0).then(|| Duration::from_secs(self.time_budget_secs))
    }

    pub fn max_solutions(&self) -> Option<usize> {
        (self.max_solutions > 0).then_some(self.max_solutions)
    }
}
