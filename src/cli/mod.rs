//! Command-line interface for the workflow launcher.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
