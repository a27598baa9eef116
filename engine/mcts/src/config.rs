//! Search and policy configuration parameters.

use std::time::Duration;

use thiserror::Error;

use crate::policy::gamma::CosLinGamma;
use crate::preference::BootstrapStatistic;

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Configuration for the path search engine.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Seed for the engine's own random stream (simulation steps).
    pub seed: u64,

    /// Score recorded for a playout whose evaluation failed.
    /// Scores are costs, so this should be worse than any real score.
    pub failure_penalty: f64,

    /// Upper bound on a single successor generation call.
    /// When set, the call runs on a worker thread and the search stops
    /// waiting at the limit with a timeout error.
    pub successor_timeout: Option<Duration>,

    /// Successor generation slower than this is logged as a warning.
    pub slow_expansion_warn: Duration,

    /// Log repeated playouts at warn instead of debug level.
    pub log_repeated_paths_as_warnings: bool,

    /// Stop `run()` after this many solutions. `None` runs to exhaustion.
    pub max_solutions: Option<usize>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            failure_penalty: 1_000_000.0,
            successor_timeout: None,
            slow_expansion_warn: Duration::from_millis(5),
            log_repeated_paths_as_warnings: false,
            max_solutions: None,
        }
    }
}

impl MctsConfig {
    /// Create a config for tests: fixed seed, no slow-expansion noise.
    pub fn for_testing() -> Self {
        Self {
            seed: 42,
            slow_expansion_warn: Duration::from_secs(1),
            ..Self::default()
        }
    }

    /// Builder pattern: set the engine seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder pattern: set the failed-evaluation penalty.
    pub fn with_failure_penalty(mut self, penalty: f64) -> Self {
        self.failure_penalty = penalty;
        self
    }

    /// Builder pattern: set the successor generation timeout.
    pub fn with_successor_timeout(mut self, timeout: Duration) -> Self {
        self.successor_timeout = Some(timeout);
        self
    }

    /// Builder pattern: stop after `n` solutions.
    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = Some(n);
        self
    }

    pub fn with_repeated_path_warnings(mut self, enabled: bool) -> Self {
        self.log_repeated_paths_as_warnings = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.failure_penalty.is_finite() {
            return Err(invalid("failure_penalty", "must be finite"));
        }
        if self.max_solutions == Some(0) {
            return Err(invalid("max_solutions", "must be positive when set"));
        }
        Ok(())
    }
}

/// Utility function used by the UCB policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityKind {
    /// Empirical Value-at-Risk of the observed costs
    ValueAtRisk,
    /// Negated mean cost (classic UCB1 with suitable `b`)
    NegatedMean,
}

impl std::str::FromStr for UtilityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "var" | "value-at-risk" => Ok(Self::ValueAtRisk),
            "mean" | "negated-mean" => Ok(Self::NegatedMean),
            other => Err(ConfigError::UnknownVariant {
                field: "ucb utility",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for the UCB-family tree policy.
#[derive(Debug, Clone)]
pub struct UcbConfig {
    pub utility: UtilityKind,

    /// Scale of the `ln(t)` term in the exploration bonus.
    pub exploration_alpha: f64,

    /// Confidence level of the Value-at-Risk utility.
    pub var_alpha: f64,

    /// Utility constant `b` of the exploration bonus.
    pub b: f64,

    /// Observations kept per arc. Oldest are evicted first.
    pub max_observations: Option<usize>,

    /// Seed for picking an arc at nodes without statistics.
    pub seed: u64,
}

impl Default for UcbConfig {
    fn default() -> Self {
        Self {
            utility: UtilityKind::ValueAtRisk,
            exploration_alpha: 3.0,
            var_alpha: 0.05,
            b: 1.0,
            max_observations: None,
            seed: 0,
        }
    }
}

impl UcbConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_utility(mut self, utility: UtilityKind) -> Self {
        self.utility = utility;
        self
    }

    pub fn with_max_observations(mut self, n: usize) -> Self {
        self.max_observations = Some(n);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.var_alpha) {
            return Err(invalid("var_alpha", "must lie in [0, 1]"));
        }
        if self.b <= 0.0 {
            return Err(invalid("b", "must be positive"));
        }
        if self.exploration_alpha < 0.0 {
            return Err(invalid("exploration_alpha", "must not be negative"));
        }
        if self.max_observations == Some(0) {
            return Err(invalid("max_observations", "must be positive when set"));
        }
        Ok(())
    }
}

/// Configuration for the Plackett-Luce tree policy.
#[derive(Debug, Clone)]
pub struct PlackettLuceConfig {
    /// Base probability of forced uniform exploration, scaled by `1 - relative depth`.
    pub epsilon: f64,

    /// Iteration cap of the MM skill estimator.
    pub mm_max_iterations: usize,

    /// L1 change of the skill vector below which MM stops.
    pub mm_tolerance: f64,

    /// Short-horizon gamma shape (absolute visit counts).
    pub short_gamma: CosLinGamma,

    /// Long-horizon gamma shape, per child; scaled by the branching factor.
    pub long_gamma_per_child: CosLinGamma,

    /// Seed for the policy's own random stream.
    pub seed: u64,
}

impl Default for PlackettLuceConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            mm_max_iterations: 1000,
            mm_tolerance: 1e-6,
            short_gamma: CosLinGamma::new(3.0, 4, 20, 2, 2),
            long_gamma_per_child: CosLinGamma::new(3.0, 50, 500, 2, 2),
            seed: 0,
        }
    }
}

impl PlackettLuceConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid("epsilon", "must lie in [0, 1]"));
        }
        if self.mm_max_iterations == 0 {
            return Err(invalid("mm_max_iterations", "must be positive"));
        }
        self.short_gamma.validate()?;
        self.long_gamma_per_child.validate()
    }
}

/// Configuration for the bootstrapping preference kernel.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Observations kept per state (oldest evicted first).
    pub max_history: usize,

    /// Draws with replacement per child and bootstrap.
    pub samples_per_bootstrap: usize,

    /// Bootstrap rankings per child; `k` children give `k * this` rankings.
    pub bootstraps_per_child: usize,

    /// Every child needs at least this many observations for reliable rankings.
    pub min_observations_per_child: usize,

    pub statistic: BootstrapStatistic,

    /// Seed for the kernel's own random stream.
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_history: 1000,
            samples_per_bootstrap: 10,
            bootstraps_per_child: 10,
            min_observations_per_child: 3,
            statistic: BootstrapStatistic::Mean,
            seed: 0,
        }
    }
}

impl BootstrapConfig {
    pub fn with_min_observations(mut self, n: usize) -> Self {
        self.min_observations_per_child = n;
        self
    }

    pub fn with_statistic(mut self, statistic: BootstrapStatistic) -> Self {
        self.statistic = statistic;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(invalid("max_history", "must be positive"));
        }
        if self.samples_per_bootstrap == 0 || self.bootstraps_per_child == 0 {
            return Err(invalid("bootstrap sizes", "must be positive"));
        }
        if let BootstrapStatistic::Quantile(q) = self.statistic {
            if !(0.0..=1.0).contains(&q) {
                return Err(invalid("quantile", "must lie in [0, 1]"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert!((config.failure_penalty - 1_000_000.0).abs() < 1e-6);
        assert!(config.successor_timeout.is_none());
        assert!(config.max_solutions.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_seed(9)
            .with_failure_penalty(10.0)
            .with_successor_timeout(Duration::from_millis(250))
            .with_max_solutions(3);

        assert_eq!(config.seed, 9);
        assert!((config.failure_penalty - 10.0).abs() < 1e-12);
        assert_eq!(config.successor_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.max_solutions, Some(3));
    }

    #[test]
    fn test_validation() {
        assert!(MctsConfig::default()
            .with_failure_penalty(f64::INFINITY)
            .validate()
            .is_err());
        assert!(UcbConfig {
            var_alpha: 1.5,
            ..UcbConfig::default()
        }
        .validate()
        .is_err());
        assert!(PlackettLuceConfig::default().validate().is_ok());
        assert!(BootstrapConfig::default()
            .with_statistic(BootstrapStatistic::Quantile(2.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_utility_kind_from_str() {
        assert_eq!("var".parse::<UtilityKind>().unwrap(), UtilityKind::ValueAtRisk);
        assert_eq!("Mean".parse::<UtilityKind>().unwrap(), UtilityKind::NegatedMean);
        assert!(matches!(
            "median".parse::<UtilityKind>(),
            Err(ConfigError::UnknownVariant { .. })
        ));
    }
}
