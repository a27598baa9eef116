//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by PATHSEARCH_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("PATHSEARCH_CONFIG") {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from PATHSEARCH_CONFIG: {}", path.display());
            return load_from_path(path);
        }
        warn!(
            "PATHSEARCH_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults with a
/// warning; env overrides are applied either way.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u64, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
    // Comma-separated list of strings
    ($config:expr, $section:ident . $field:ident, $key:expr, list) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: PATHSEARCH_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "PATHSEARCH_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "PATHSEARCH_COMMON_SEED", parse);

    // Search
    env_override!(
        config,
        search.failure_penalty,
        "PATHSEARCH_SEARCH_FAILURE_PENALTY",
        parse
    );
    env_override!(
        config,
        search.successor_timeout_ms,
        "PATHSEARCH_SEARCH_SUCCESSOR_TIMEOUT_MS",
        parse
    );
    env_override!(
        config,
        search.slow_expansion_warn_ms,
        "PATHSEARCH_SEARCH_SLOW_EXPANSION_WARN_MS",
        parse
    );
    env_override!(
        config,
        search.log_repeated_paths_as_warnings,
        "PATHSEARCH_SEARCH_LOG_REPEATED_PATHS_AS_WARNINGS",
        parse
    );
    env_override!(config, search.tree_policy, "PATHSEARCH_SEARCH_TREE_POLICY");
    env_override!(
        config,
        search.default_policy,
        "PATHSEARCH_SEARCH_DEFAULT_POLICY"
    );
    env_override!(
        config,
        search.ensemble_members,
        "PATHSEARCH_SEARCH_ENSEMBLE_MEMBERS",
        list
    );
    env_override!(
        config,
        search.ensemble_selection,
        "PATHSEARCH_SEARCH_ENSEMBLE_SELECTION"
    );
    env_override!(
        config,
        search.max_solutions,
        "PATHSEARCH_SEARCH_MAX_SOLUTIONS",
        parse
    );
    env_override!(
        config,
        search.time_budget_secs,
        "PATHSEARCH_SEARCH_TIME_BUDGET_SECS",
        parse
    );

    // UCB
    env_override!(config, ucb.utility, "PATHSEARCH_UCB_UTILITY");
    env_override!(
        config,
        ucb.exploration_alpha,
        "PATHSEARCH_UCB_EXPLORATION_ALPHA",
        parse
    );
    env_override!(config, ucb.var_alpha, "PATHSEARCH_UCB_VAR_ALPHA", parse);
    env_override!(config, ucb.b, "PATHSEARCH_UCB_B", parse);
    env_override!(
        config,
        ucb.max_observations,
        "PATHSEARCH_UCB_MAX_OBSERVATIONS",
        parse
    );

    // Plackett-Luce
    env_override!(
        config,
        plackett_luce.epsilon,
        "PATHSEARCH_PLACKETT_LUCE_EPSILON",
        parse
    );
    env_override!(
        config,
        plackett_luce.mm_max_iterations,
        "PATHSEARCH_PLACKETT_LUCE_MM_MAX_ITERATIONS",
        parse
    );
    env_override!(
        config,
        plackett_luce.mm_tolerance,
        "PATHSEARCH_PLACKETT_LUCE_MM_TOLERANCE",
        parse
    );
    env_override!(
        config,
        plackett_luce.short_max_gamma,
        "PATHSEARCH_PLACKETT_LUCE_SHORT_MAX_GAMMA",
        parse
    );
    env_override!(
        config,
        plackett_luce.long_max_gamma,
        "PATHSEARCH_PLACKETT_LUCE_LONG_MAX_GAMMA",
        parse
    );

    // Bootstrap
    env_override!(
        config,
        bootstrap.max_history,
        "PATHSEARCH_BOOTSTRAP_MAX_HISTORY",
        parse
    );
    env_override!(
        config,
        bootstrap.samples_per_bootstrap,
        "PATHSEARCH_BOOTSTRAP_SAMPLES_PER_BOOTSTRAP",
        parse
    );
    env_override!(
        config,
        bootstrap.bootstraps_per_child,
        "PATHSEARCH_BOOTSTRAP_BOOTSTRAPS_PER_CHILD",
        parse
    );
    env_override!(
        config,
        bootstrap.min_observations_per_child,
        "PATHSEARCH_BOOTSTRAP_MIN_OBSERVATIONS_PER_CHILD",
        parse
    );
    env_override!(config, bootstrap.statistic, "PATHSEARCH_BOOTSTRAP_STATISTIC");
    env_override!(
        config,
        bootstrap.quantile,
        "PATHSEARCH_BOOTSTRAP_QUANTILE",
        parse
    );
    env_override!(config, bootstrap.seed, "PATHSEARCH_BOOTSTRAP_SEED", parse);

    config
}
