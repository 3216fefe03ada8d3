//! Command-line interface for swaprunn.
//!
//! Provides the `serve` and `migrate` commands.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
