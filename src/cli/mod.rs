//! Command-line interface for pre-commit-mcp

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
