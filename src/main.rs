//! platepals-workflow CLI entry point.
//!
//! Resolves the environment configuration, initializes logging and
//! delegates to the CLI module for mode handling.

use platepals_workflow::cli;
use platepals_workflow::config::WorkflowConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration is resolved before any argument handling; a missing
    // variable aborts the process here.
    let config = WorkflowConfig::from_env()?;

    let cli = cli::parse_cli();

    // Initialize tracing with environment filter
    // Priority: RUST_LOG env var > --log-level CLI arg > default "info"
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    cli::run_with_cli(cli, config).await
}
