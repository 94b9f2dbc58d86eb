//! # pre-commit-mcp
//!
//! Runs the pre-commit hook runner on the staged changes of the enclosing git
//! repository and turns its free-form console output into a compact,
//! structured report for programmatic callers (MCP tool `pre_commit_run`).
//!
//! One invocation is a strictly sequential pipeline:
//!
//! 1. [`git::locate_from`] finds the working tree (or honours `force_non_git`)
//! 2. [`runner::ProcessInvoker`] runs the hook runner under a hard timeout
//! 3. [`report::classify`] decides the terminal [`report::RunOutcome`]
//! 4. [`report::Normalizer`] parses hook sections, failures and modified paths
//! 5. [`report::RunReport`] is assembled and returned
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve the tool over stdio
//! pre-commit-mcp serve
//!
//! # Or run once from a shell
//! pre-commit-mcp run --format text
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod mcp;
pub mod pipeline;
pub mod report;
pub mod runner;

pub use cli::{Cli, Output};
pub use config::Config;
pub use error::PipelineError;
pub use pipeline::{PreCommitPipeline, RunRequest};
pub use report::{RunOutcome, RunReport};

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
