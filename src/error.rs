//! Error taxonomy for the pre-commit pipeline
//!
//! Only conditions that leave nothing to interpret are errors here. A timeout,
//! failing hooks and unrecognized runner output all resolve into a
//! [`RunReport`](crate::report::RunReport) instead.

use crate::report::RunOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Hard failures of a single `pre_commit_run` invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No git metadata at or above the starting directory and no override
    #[error("No git repository found at or above {}", path.display())]
    NotAGitRepository { path: PathBuf },

    /// The hook runner executable could not be started
    #[error("Failed to launch hook runner '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child process or reading the working directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Every hard failure is reported to callers as a system error
    pub fn status(&self) -> RunOutcome {
        RunOutcome::SystemError
    }

    /// Caller-facing sentence that never carries the raw OS error text
    pub fn summary(&self) -> String {
        match self {
            Self::NotAGitRepository { path } => format!(
                "Git repository not initialized in {}. Run 'git init' or pass force_non_git=true.",
                path.display()
            ),
            Self::LaunchFailure { program, .. } => {
                format!("Hook runner '{program}' could not be started. Is it installed and on PATH?")
            }
            Self::Io(_) => "Internal I/O failure while running the hook runner.".to_string(),
        }
    }
}
