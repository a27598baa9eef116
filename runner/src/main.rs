//! mcts-runner - MCTS path search driver
//!
//! A command line process that:
//! 1. Loads the central configuration and CLI overrides
//! 2. Builds a synthetic graph and the configured tree/default policies
//! 3. Runs the search on a blocking worker until the graph is exhausted,
//!    the solution limit is hit, the time budget runs out or Ctrl+C arrives
//! 4. Prints a JSON report (best path, statistics, optionally all solutions)

use anyhow::{Context, Result};
use clap::Parser;
use search_core::CancellationToken;
use tokio::signal;
use tracing::{error, info};

mod config;
mod policies;
mod report;
mod run;

use crate::config::Config;
use crate::policies::SearchSettings;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs on stderr, the report on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let settings = SearchSettings::from_central(
        config::central(),
        config.seed,
        &config.tree_policy,
        &config.default_policy,
        config.max_solutions(),
    )?;

    info!(
        graph = ?config.graph,
        tree_policy = %settings.tree_policy,
        default_policy = %settings.default_policy,
        seed = settings.seed,
        max_solutions = ?settings.engine.max_solutions,
        time_budget_secs = config.time_budget_secs,
        "Starting search"
    );

    let token = match config.time_budget() {
        Some(budget) => CancellationToken::with_timeout(budget),
        None => CancellationToken::new(),
    };

    // Setup graceful shutdown
    let shutdown_token = token.clone();
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, cancelling search...");
                shutdown_token.cancel();
            }
            Err(e) => error!("Failed to listen for ctrl+c: {}", e),
        }
    });

    // The search is CPU bound; keep it off the async workers
    let run_config = config.clone();
    let run_result = tokio::task::spawn_blocking(move || run::execute(&run_config, &settings, token))
        .await
        .context("Search task panicked")?;

    shutdown_handle.abort();

    match run_result {
        Ok(report) => {
            report.write(config.output.as_deref())?;
            info!(outcome = ?report.outcome, "Runner completed");
            Ok(())
        }
        Err(e) => {
            error!("Search failed: {:#}", e);
            Err(e)
        }
    }
}
