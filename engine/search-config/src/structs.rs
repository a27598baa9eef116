//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_common_log_level() -> String {
    defaults::log_level().into()
}
fn d_common_seed() -> u64 {
    defaults::seed()
}
fn d_search_failure_penalty() -> f64 {
    defaults::failure_penalty()
}
fn d_search_successor_timeout_ms() -> u64 {
    defaults::successor_timeout_ms()
}
fn d_search_slow_expansion_warn_ms() -> u64 {
    defaults::slow_expansion_warn_ms()
}
fn d_search_log_repeated_paths_as_warnings() -> bool {
    defaults::log_repeated_paths_as_warnings()
}
fn d_search_tree_policy() -> String {
    defaults::tree_policy().into()
}
fn d_search_default_policy() -> String {
    defaults::default_policy().into()
}
fn d_search_ensemble_members() -> Vec<String> {
    defaults::ensemble_members().to_vec()
}
fn d_search_ensemble_selection() -> String {
    defaults::ensemble_selection().into()
}
fn d_search_max_solutions() -> usize {
    defaults::max_solutions()
}
fn d_search_time_budget_secs() -> u64 {
    defaults::time_budget_secs()
}
fn d_ucb_utility() -> String {
    defaults::ucb_utility().into()
}
fn d_ucb_exploration_alpha() -> f64 {
    defaults::exploration_alpha()
}
fn d_ucb_var_alpha() -> f64 {
    defaults::var_alpha()
}
fn d_ucb_b() -> f64 {
    defaults::ucb_b()
}
fn d_ucb_max_observations() -> usize {
    defaults::max_observations()
}
fn d_plackett_luce_epsilon() -> f64 {
    defaults::pl_epsilon()
}
fn d_plackett_luce_mm_max_iterations() -> usize {
    defaults::mm_max_iterations()
}
fn d_plackett_luce_mm_tolerance() -> f64 {
    defaults::mm_tolerance()
}
fn d_plackett_luce_short_max_gamma() -> f64 {
    defaults::short_max_gamma()
}
fn d_plackett_luce_short_visits_for_one() -> u64 {
    defaults::short_visits_for_one()
}
fn d_plackett_luce_short_visits_for_max() -> u64 {
    defaults::short_visits_for_max()
}
fn d_plackett_luce_short_min_support_init() -> u64 {
    defaults::short_min_support_init()
}
fn d_plackett_luce_short_min_support_abs() -> u64 {
    defaults::short_min_support_abs()
}
fn d_plackett_luce_long_max_gamma() -> f64 {
    defaults::long_max_gamma()
}
fn d_plackett_luce_long_visits_per_child_for_one() -> u64 {
    defaults::long_visits_per_child_for_one()
}
fn d_plackett_luce_long_visits_per_child_for_max() -> u64 {
    defaults::long_visits_per_child_for_max()
}
fn d_plackett_luce_long_min_support_per_child_init() -> u64 {
    defaults::long_min_support_per_child_init()
}
fn d_plackett_luce_long_min_support_per_child_abs() -> u64 {
    defaults::long_min_support_per_child_abs()
}
fn d_bootstrap_max_history() -> usize {
    defaults::max_history()
}
fn d_bootstrap_samples_per_bootstrap() -> usize {
    defaults::samples_per_bootstrap()
}
fn d_bootstrap_bootstraps_per_child() -> usize {
    defaults::bootstraps_per_child()
}
fn d_bootstrap_min_observations_per_child() -> usize {
    defaults::min_observations_per_child()
}
fn d_bootstrap_statistic() -> String {
    defaults::bootstrap_statistic().into()
}
fn d_bootstrap_quantile() -> f64 {
    defaults::bootstrap_quantile()
}
fn d_bootstrap_seed() -> u64 {
    defaults::bootstrap_seed()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ucb: UcbConfig,
    #[serde(default)]
    pub plackett_luce: PlackettLuceConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_common_log_level")]
    pub log_level: String,
    /// Seed for the engine random stream; policies derive theirs from it
    #[serde(default = "d_common_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// Search engine behaviour and policy selection
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Score recorded for a playout whose evaluation failed
    #[serde(default = "d_search_failure_penalty")]
    pub failure_penalty: f64,
    /// Per-call successor generation limit in milliseconds (0 = none)
    #[serde(default = "d_search_successor_timeout_ms")]
    pub successor_timeout_ms: u64,
    #[serde(default = "d_search_slow_expansion_warn_ms")]
    pub slow_expansion_warn_ms: u64,
    #[serde(default = "d_search_log_repeated_paths_as_warnings")]
    pub log_repeated_paths_as_warnings: bool,
    /// One of `ucb`, `plackett-luce`, `uniform`, `ensemble`
    #[serde(default = "d_search_tree_policy")]
    pub tree_policy: String,
    #[serde(default = "d_search_default_policy")]
    pub default_policy: String,
    #[serde(default = "d_search_ensemble_members")]
    pub ensemble_members: Vec<String>,
    #[serde(default = "d_search_ensemble_selection")]
    pub ensemble_selection: String,
    /// Stop after this many solutions (0 = run to exhaustion)
    #[serde(default = "d_search_max_solutions")]
    pub max_solutions: usize,
    #[serde(default = "d_search_time_budget_secs")]
    pub time_budget_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            failure_penalty: defaults::failure_penalty(),
            successor_timeout_ms: defaults::successor_timeout_ms(),
            slow_expansion_warn_ms: defaults::slow_expansion_warn_ms(),
            log_repeated_paths_as_warnings: defaults::log_repeated_paths_as_warnings(),
            tree_policy: defaults::tree_policy().into(),
            default_policy: defaults::default_policy().into(),
            ensemble_members: defaults::ensemble_members().to_vec(),
            ensemble_selection: defaults::ensemble_selection().into(),
            max_solutions: defaults::max_solutions(),
            time_budget_secs: defaults::time_budget_secs(),
        }
    }
}

/// UCB-family tree policy
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UcbConfig {
    /// `var` (Value-at-Risk) or `mean`
    #[serde(default = "d_ucb_utility")]
    pub utility: String,
    #[serde(default = "d_ucb_exploration_alpha")]
    pub exploration_alpha: f64,
    #[serde(default = "d_ucb_var_alpha")]
    pub var_alpha: f64,
    #[serde(default = "d_ucb_b")]
    pub b: f64,
    /// Bound on observations kept per arc (0 = unbounded)
    #[serde(default = "d_ucb_max_observations")]
    pub max_observations: usize,
}

impl Default for UcbConfig {
    fn default() -> Self {
        Self {
            utility: defaults::ucb_utility().into(),
            exploration_alpha: defaults::exploration_alpha(),
            var_alpha: defaults::var_alpha(),
            b: defaults::ucb_b(),
            max_observations: defaults::max_observations(),
        }
    }
}

/// Plackett-Luce tree policy and its gamma shaping
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlackettLuceConfig {
    #[serde(default = "d_plackett_luce_epsilon")]
    pub epsilon: f64,
    #[serde(default = "d_plackett_luce_mm_max_iterations")]
    pub mm_max_iterations: usize,
    #[serde(default = "d_plackett_luce_mm_tolerance")]
    pub mm_tolerance: f64,
    #[serde(default = "d_plackett_luce_short_max_gamma")]
    pub short_max_gamma: f64,
    #[serde(default = "d_plackett_luce_short_visits_for_one")]
    pub short_visits_for_one: u64,
    #[serde(default = "d_plackett_luce_short_visits_for_max")]
    pub short_visits_for_max: u64,
    #[serde(default = "d_plackett_luce_short_min_support_init")]
    pub short_min_support_init: u64,
    #[serde(default = "d_plackett_luce_short_min_support_abs")]
    pub short_min_support_abs: u64,
    #[serde(default = "d_plackett_luce_long_max_gamma")]
    pub long_max_gamma: f64,
    #[serde(default = "d_plackett_luce_long_visits_per_child_for_one")]
    pub long_visits_per_child_for_one: u64,
    #[serde(default = "d_plackett_luce_long_visits_per_child_for_max")]
    pub long_visits_per_child_for_max: u64,
    #[serde(default = "d_plackett_luce_long_min_support_per_child_init")]
    pub long_min_support_per_child_init: u64,
    #[serde(default = "d_plackett_luce_long_min_support_per_child_abs")]
    pub long_min_support_per_child_abs: u64,
}

impl Default for PlackettLuceConfig {
    fn default() -> Self {
        Self {
            epsilon: defaults::pl_epsilon(),
            mm_max_iterations: defaults::mm_max_iterations(),
            mm_tolerance: defaults::mm_tolerance(),
            short_max_gamma: defaults::short_max_gamma(),
            short_visits_for_one: defaults::short_visits_for_one(),
            short_visits_for_max: defaults::short_visits_for_max(),
            short_min_support_init: defaults::short_min_support_init(),
            short_min_support_abs: defaults::short_min_support_abs(),
            long_max_gamma: defaults::long_max_gamma(),
            long_visits_per_child_for_one: defaults::long_visits_per_child_for_one(),
            long_visits_per_child_for_max: defaults::long_visits_per_child_for_max(),
            long_min_support_per_child_init: defaults::long_min_support_per_child_init(),
            long_min_support_per_child_abs: defaults::long_min_support_per_child_abs(),
        }
    }
}

/// Bootstrapping preference kernel
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BootstrapConfig {
    #[serde(default = "d_bootstrap_max_history")]
    pub max_history: usize,
    #[serde(default = "d_bootstrap_samples_per_bootstrap")]
    pub samples_per_bootstrap: usize,
    #[serde(default = "d_bootstrap_bootstraps_per_child")]
    pub bootstraps_per_child: usize,
    #[serde(default = "d_bootstrap_min_observations_per_child")]
    pub min_observations_per_child: usize,
    /// `mean`, `median`, `min`, `max` or `quantile`
    #[serde(default = "d_bootstrap_statistic")]
    pub statistic: String,
    /// Only used by the `quantile` statistic
    #[serde(default = "d_bootstrap_quantile")]
    pub quantile: f64,
    #[serde(default = "d_bootstrap_seed")]
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_history: defaults::max_history(),
            samples_per_bootstrap: defaults::samples_per_bootstrap(),
            bootstraps_per_child: defaults::bootstraps_per_child(),
            min_observations_per_child: defaults::min_observations_per_child(),
            statistic: defaults::bootstrap_statistic().into(),
            quantile: defaults::bootstrap_quantile(),
            seed: defaults::bootstrap_seed(),
        }
    }
}
