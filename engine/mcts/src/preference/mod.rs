//! Preference kernels for the Plackett-Luce policy.
//!
//! A kernel collects playout scores per state and turns the score histories
//! of a node's children into rankings (best child first).

use search_core::SearchPath;

use crate::config::ConfigError;
use crate::graph::ExploredGraph;

pub mod bootstrapping;

pub use bootstrapping::BootstrappingPreferenceKernel;

pub trait PreferenceKernel<N, A>: Send {
    /// Record `score` for every state on `path`.
    fn signal_new_score(&mut self, path: &SearchPath<N, A>, score: f64);

    /// Whether every attached child of `node` has enough observations.
    fn can_produce_reliable_rankings(&self, graph: &ExploredGraph<N, A>, node: &N) -> bool;

    /// Fresh rankings over the attached children of `node`.
    ///
    /// `None` when some child has no observations at all.
    fn rankings_for_children(&mut self, graph: &ExploredGraph<N, A>, node: &N) -> Option<Vec<Vec<N>>>;
}

/// Reduces one bootstrap resample to a scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BootstrapStatistic {
    Mean,
    Median,
    Min,
    Max,
    /// Nearest-rank quantile in `[0, 1]`
    Quantile(f64),
}

impl BootstrapStatistic {
    /// Parse a statistic name; `quantile` is only used for `"quantile"`.
    pub fn from_name(name: &str, quantile: f64) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "quantile" => Ok(Self::Quantile(quantile)),
            other => Err(ConfigError::UnknownVariant {
                field: "bootstrap statistic",
                value: other.to_string(),
            }),
        }
    }

    /// Apply the statistic. `sample` is reordered. NaN for an empty sample.
    pub fn apply(&self, sample: &mut [f64]) -> f64 {
        if sample.is_empty() {
            return f64::NAN;
        }
        let n = sample.len();
        match self {
            Self::Mean => sample.iter().sum::<f64>() / n as f64,
            Self::Min => sample.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => sample.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Median => {
                sample.sort_by(f64::total_cmp);
                if n % 2 == 1 {
                    sample[n / 2]
                } else {
                    (sample[n / 2 - 1] + sample[n / 2]) / 2.0
                }
            }
            Self::Quantile(q) => {
                sample.sort_by(f64::total_cmp);
                let rank = (q.clamp(0.0, 1.0) * n as f64).ceil() as usize;
                sample[rank.saturating_sub(1).min(n - 1)]
            }
        }
    }
}
