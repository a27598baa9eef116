//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file sits at the workspace root and is embedded at compile
//! time, so every crate and the checked-in documentation agree on one set of
//! values.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    ucb: UcbDefaults,
    plackett_luce: PlackettLuceDefaults,
    bootstrap: BootstrapDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    failure_penalty: f64,
    successor_timeout_ms: u64,
    slow_expansion_warn_ms: u64,
    log_repeated_paths_as_warnings: bool,
    tree_policy: String,
    default_policy: String,
    ensemble_members: Vec<String>,
    ensemble_selection: String,
    max_solutions: usize,
    time_budget_secs: u64,
}

#[derive(Debug, Deserialize)]
struct UcbDefaults {
    utility: String,
    exploration_alpha: f64,
    var_alpha: f64,
    b: f64,
    max_observations: usize,
}

#[derive(Debug, Deserialize)]
struct PlackettLuceDefaults {
    epsilon: f64,
    mm_max_iterations: usize,
    mm_tolerance: f64,
    short_max_gamma: f64,
    short_visits_for_one: u64,
    short_visits_for_max: u64,
    short_min_support_init: u64,
    short_min_support_abs: u64,
    long_max_gamma: f64,
    long_visits_per_child_for_one: u64,
    long_visits_per_child_for_max: u64,
    long_min_support_per_child_init: u64,
    long_min_support_per_child_abs: u64,
}

#[derive(Debug, Deserialize)]
struct BootstrapDefaults {
    max_history: usize,
    samples_per_bootstrap: usize,
    bootstraps_per_child: usize,
    min_observations_per_child: usize,
    statistic: String,
    quantile: f64,
    seed: u64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Search
pub fn failure_penalty() -> f64 {
    DEFAULTS.search.failure_penalty
}
pub fn successor_timeout_ms() -> u64 {
    DEFAULTS.search.successor_timeout_ms
}
pub fn slow_expansion_warn_ms() -> u64 {
    DEFAULTS.search.slow_expansion_warn_ms
}
pub fn log_repeated_paths_as_warnings() -> bool {
    DEFAULTS.search.log_repeated_paths_as_warnings
}
pub fn tree_policy() -> &'static str {
    &DEFAULTS.search.tree_policy
}
pub fn default_policy() -> &'static str {
    &DEFAULTS.search.default_policy
}
pub fn ensemble_members() -> &'static [String] {
    &DEFAULTS.search.ensemble_members
}
pub fn ensemble_selection() -> &'static str {
    &DEFAULTS.search.ensemble_selection
}
pub fn max_solutions() -> usize {
    DEFAULTS.search.max_solutions
}
pub fn time_budget_secs() -> u64 {
    DEFAULTS.search.time_budget_secs
}

// UCB
pub fn ucb_utility() -> &'static str {
    &DEFAULTS.ucb.utility
}
pub fn exploration_alpha() -> f64 {
    DEFAULTS.ucb.exploration_alpha
}
pub fn var_alpha() -> f64 {
    DEFAULTS.ucb.var_alpha
}
pub fn ucb_b() -> f64 {
    DEFAULTS.ucb.b
}
pub fn max_observations() -> usize {
    DEFAULTS.ucb.max_observations
}

// Plackett-Luce
pub fn pl_epsilon() -> f64 {
    DEFAULTS.plackett_luce.epsilon
}
pub fn mm_max_iterations() -> usize {
    DEFAULTS.plackett_luce.mm_max_iterations
}
pub fn mm_tolerance() -> f64 {
    DEFAULTS.plackett_luce.mm_tolerance
}
pub fn short_max_gamma() -> f64 {
    DEFAULTS.plackett_luce.short_max_gamma
}
pub fn short_visits_for_one() -> u64 {
    DEFAULTS.plackett_luce.short_visits_for_one
}
pub fn short_visits_for_max() -> u64 {
    DEFAULTS.plackett_luce.short_visits_for_max
}
pub fn short_min_support_init() -> u64 {
    DEFAULTS.plackett_luce.short_min_support_init
}
pub fn short_min_support_abs() -> u64 {
    DEFAULTS.plackett_luce.short_min_support_abs
}
pub fn long_max_gamma() -> f64 {
    DEFAULTS.plackett_luce.long_max_gamma
}
pub fn long_visits_per_child_for_one() -> u64 {
    DEFAULTS.plackett_luce.long_visits_per_child_for_one
}
pub fn long_visits_per_child_for_max() -> u64 {
    DEFAULTS.plackett_luce.long_visits_per_child_for_max
}
pub fn long_min_support_per_child_init() -> u64 {
    DEFAULTS.plackett_luce.long_min_support_per_child_init
}
pub fn long_min_support_per_child_abs() -> u64 {
    DEFAULTS.plackett_luce.long_min_support_per_child_abs
}

// Bootstrap
pub fn max_history() -> usize {
    DEFAULTS.bootstrap.max_history
}
pub fn samples_per_bootstrap() -> usize {
    DEFAULTS.bootstrap.samples_per_bootstrap
}
pub fn bootstraps_per_child() -> usize {
    DEFAULTS.bootstrap.bootstraps_per_child
}
pub fn min_observations_per_child() -> usize {
    DEFAULTS.bootstrap.min_observations_per_child
}
pub fn bootstrap_statistic() -> &'static str {
    &DEFAULTS.bootstrap.statistic
}
pub fn bootstrap_quantile() -> f64 {
    DEFAULTS.bootstrap.quantile
}
pub fn bootstrap_seed() -> u64 {
    DEFAULTS.bootstrap.seed
}
