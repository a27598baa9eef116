//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the search engine and the runner binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`PATHSEARCH_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! PATHSEARCH_<SECTION>_<KEY>=value
//!
//! Examples:
//!     PATHSEARCH_COMMON_SEED=7
//!     PATHSEARCH_SEARCH_TREE_POLICY=plackett-luce
//!     PATHSEARCH_UCB_VAR_ALPHA=0.1
//!     PATHSEARCH_BOOTSTRAP_MAX_HISTORY=500
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
