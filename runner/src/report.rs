//! JSON report of a finished run.

use anyhow::{Context, Result};
use mcts::SearchStats;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every goal path was evaluated
    Exhausted,
    /// `max_solutions` reached
    SolutionLimit,
    /// Ctrl+C
    Cancelled,
    /// Wall-clock budget ran out
    TimedOut,
}

/// One evaluated goal path, rendered for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub score: f64,
    pub depth: usize,
    pub actions: Vec<String>,
}

/// Serializable counters, mirroring `SearchStats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub playouts: u64,
    pub restarts: u64,
    pub evaluations: u64,
    pub failed_evaluations: u64,
    pub cache_hits: u64,
    pub solutions: u64,
    pub explored_nodes: usize,
    pub unexpanded_nodes: usize,
}

impl From<SearchStats> for StatsSnapshot {
    fn from(stats: SearchStats) -> Self {
        Self {
            playouts: stats.playouts,
            restarts: stats.restarts,
            evaluations: stats.evaluations,
            failed_evaluations: stats.failed_evaluations,
            cache_hits: stats.cache_hits,
            solutions: stats.solutions,
            explored_nodes: stats.nodes,
            unexpanded_nodes: stats.unexpanded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub graph: String,
    pub tree_policy: String,
    pub default_policy: String,
    pub seed: u64,
    pub outcome: Outcome,
    pub runtime_seconds: f64,
    pub best: Option<SolutionRecord>,
    pub stats: StatsSnapshot,
    /// Discovery order; empty unless requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<SolutionRecord>,
}

impl Report {
    /// Pretty-printed JSON to `output`, or stdout when `None`.
    pub fn write(&self, output: Option<&str>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        match output {
            Some(path) => {
                let path = Path::new(path);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(path, json)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!(path = %path.display(), "Report written");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}").context("Failed to write report to stdout")?;
            }
        }
        Ok(())
    }
}
