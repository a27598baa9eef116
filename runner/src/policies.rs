//! Engine and policy construction from the central configuration
//!
//! Maps the `[search]`, `[ucb]`, `[plackett_luce]` and `[bootstrap]`
//! sections onto the plain config structs of the `mcts` crate. Every random
//! stream is derived from the run seed so that equal seeds give equal runs.

use anyhow::{anyhow, bail, Context, Result};
use mcts::{
    BootstrapStatistic, CosLinGamma, EnsemblePolicy, MctsConfig, MemberSelection,
    PlackettLucePolicy, Policy, PolicyKey, TreePolicy, UcbPolicy, UniformRandomPolicy,
    UtilityKind,
};
use search_config::CentralConfig;
use std::time::Duration;
use tracing::debug;

/// Accepted `tree_policy` names
pub const TREE_POLICIES: &[&str] = &["ucb", "plackett-luce", "uniform", "ensemble"];

/// Accepted `default_policy` names
pub const DEFAULT_POLICIES: &[&str] = &["uniform"];

// Offsets keeping the per-component streams apart
const PLACKETT_LUCE_STREAM: u64 = 1;
const BOOTSTRAP_STREAM: u64 = 2;
const UNIFORM_TREE_STREAM: u64 = 3;
const DEFAULT_POLICY_STREAM: u64 = 4;
const ENSEMBLE_STREAM: u64 = 5;
const UCB_STREAM: u64 = 6;

/// Everything needed to build the engine and its policies for one run
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub engine: MctsConfig,
    pub ucb: mcts::UcbConfig,
    pub plackett_luce: mcts::PlackettLuceConfig,
    pub bootstrap: mcts::BootstrapConfig,
    pub tree_policy: String,
    pub default_policy: String,
    pub ensemble_members: Vec<String>,
    pub ensemble_selection: MemberSelection,
    pub seed: u64,
}

impl SearchSettings {
    /// Build and validate settings. `seed` and the two policy names usually
    /// come from the CLI, which already defaults them to the central config.
    pub fn from_central(
        central: &CentralConfig,
        seed: u64,
        tree_policy: &str,
        default_policy: &str,
        max_solutions: Option<usize>,
    ) -> Result<Self> {
        let search = &central.search;

        let mut engine = MctsConfig::default()
            .with_seed(seed)
            .with_failure_penalty(search.failure_penalty)
            .with_repeated_path_warnings(search.log_repeated_paths_as_warnings);
        engine.slow_expansion_warn = Duration::from_millis(search.slow_expansion_warn_ms);
        if search.successor_timeout_ms > 0 {
            engine = engine.with_successor_timeout(Duration::from_millis(search.successor_timeout_ms));
        }
        if let Some(max) = max_solutions {
            engine = engine.with_max_solutions(max);
        }
        engine.validate().context("invalid [search] configuration")?;

        let ucb = mcts::UcbConfig {
            utility: central
                .ucb
                .utility
                .parse::<UtilityKind>()
                .context("invalid [ucb] configuration")?,
            exploration_alpha: central.ucb.exploration_alpha,
            var_alpha: central.ucb.var_alpha,
            b: central.ucb.b,
            max_observations: (central.ucb.max_observations > 0)
                .then_some(central.ucb.max_observations),
            seed: seed.wrapping_add(UCB_STREAM),
        };
        ucb.validate().context("invalid [ucb] configuration")?;

        let pl = &central.plackett_luce;
        let plackett_luce = mcts::PlackettLuceConfig {
            epsilon: pl.epsilon,
            mm_max_iterations: pl.mm_max_iterations,
            mm_tolerance: pl.mm_tolerance,
            short_gamma: CosLinGamma::new(
                pl.short_max_gamma,
                pl.short_visits_for_one,
                pl.short_visits_for_max,
                pl.short_min_support_init,
                pl.short_min_support_abs,
            ),
            long_gamma_per_child: CosLinGamma::new(
                pl.long_max_gamma,
                pl.long_visits_per_child_for_one,
                pl.long_visits_per_child_for_max,
                pl.long_min_support_per_child_init,
                pl.long_min_support_per_child_abs,
            ),
            seed: seed.wrapping_add(PLACKETT_LUCE_STREAM),
        };
        plackett_luce
            .validate()
            .context("invalid [plackett_luce] configuration")?;

        let bs = &central.bootstrap;
        let bootstrap = mcts::BootstrapConfig {
            max_history: bs.max_history,
            samples_per_bootstrap: bs.samples_per_bootstrap,
            bootstraps_per_child: bs.bootstraps_per_child,
            min_observations_per_child: bs.min_observations_per_child,
            statistic: BootstrapStatistic::from_name(&bs.statistic, bs.quantile)
                .context("invalid [bootstrap] configuration")?,
            seed: bs.seed.wrapping_add(seed).wrapping_add(BOOTSTRAP_STREAM),
        };
        bootstrap
            .validate()
            .context("invalid [bootstrap] configuration")?;

        let ensemble_selection = search
            .ensemble_selection
            .parse::<MemberSelection>()
            .context("invalid [search] configuration")?;

        Ok(Self {
            engine,
            ucb,
            plackett_luce,
            bootstrap,
            tree_policy: tree_policy.to_ascii_lowercase(),
            default_policy: default_policy.to_ascii_lowercase(),
            ensemble_members: search.ensemble_members.clone(),
            ensemble_selection,
            seed,
        })
    }

    /// The configured tree policy
    pub fn tree_policy<N, A>(&self) -> Result<Box<dyn TreePolicy<N, A>>>
    where
        N: PolicyKey + 'static,
        A: PolicyKey + 'static,
    {
        self.named_tree_policy(&self.tree_policy, true)
    }

    /// The configured default policy
    pub fn default_policy<N, A>(&self) -> Result<Box<dyn Policy<N, A>>>
    where
        N: PolicyKey + 'static,
        A: PolicyKey + 'static,
    {
        match self.default_policy.as_str() {
            "uniform" => Ok(Box::new(UniformRandomPolicy::new(
                self.seed.wrapping_add(DEFAULT_POLICY_STREAM),
            ))),
            other => Err(anyhow!("unknown default policy '{other}'")),
        }
    }

    fn named_tree_policy<N, A>(&self, name: &str, allow_ensemble: bool) -> Result<Box<dyn TreePolicy<N, A>>>
    where
        N: PolicyKey + 'static,
        A: PolicyKey + 'static,
    {
        debug!(policy = name, "Building tree policy");
        match name {
            "ucb" => Ok(Box::new(UcbPolicy::new(&self.ucb))),
            "plackett-luce" | "plackett_luce" | "pl" => Ok(Box::new(
                PlackettLucePolicy::with_bootstrapping(self.plackett_luce.clone(), self.bootstrap.clone()),
            )),
            "uniform" => Ok(Box::new(UniformRandomPolicy::new(
                self.seed.wrapping_add(UNIFORM_TREE_STREAM),
            ))),
            "ensemble" => {
                if !allow_ensemble {
                    bail!("ensemble members cannot be ensembles themselves");
                }
                let members = self
                    .ensemble_members
                    .iter()
                    .map(|member| self.named_tree_policy(&member.to_ascii_lowercase(), false))
                    .collect::<Result<Vec<_>>>()?;
                let ensemble = EnsemblePolicy::new(
                    members,
                    self.ensemble_selection,
                    self.seed.wrapping_add(ENSEMBLE_STREAM),
                )?;
                Ok(Box::new(ensemble))
            }
            other => Err(anyhow!("unknown tree policy '{other}'")),
        }
    }
}
