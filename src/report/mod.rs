//! Structured run reports
//!
//! The report is the only thing a caller sees. Its shape stays fixed whatever
//! the runner printed: an outcome, hook counters, failures grouped by hook id,
//! the files auto-fixers touched, and the wall time.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub mod classify;
pub mod parse;

pub use classify::{classify, crash_signature};
pub use parse::{Normalized, Normalizer};

/// Terminal state of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    HooksFailed,
    SystemError,
    Timeout,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::HooksFailed => "hooks_failed",
            Self::SystemError => "system_error",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal marker on a hook header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Passed,
    Failed,
    Skipped,
}

/// One hook section of runner output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResult {
    /// Grouping key in [`FailureGroup`], not repeated in the payload
    #[serde(skip)]
    pub hook_id: String,
    pub passed: bool,
    pub detail: Option<String>,
}

impl HookResult {
    pub fn failed(hook_id: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            hook_id: hook_id.into(),
            passed: false,
            detail,
        }
    }
}

/// Failing hook results keyed by hook id, in first-failure order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureGroup(IndexMap<String, Vec<HookResult>>);

impl FailureGroup {
    /// Append a result under its hook id; passing results are ignored so no
    /// hook ever appears without a failing entry
    pub fn push(&mut self, result: HookResult) {
        if result.passed {
            return;
        }
        self.0
            .entry(result.hook_id.clone())
            .or_default()
            .push(result);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, hook_id: &str) -> Option<&[HookResult]> {
        self.0.get(hook_id).map(Vec::as_slice)
    }

    pub fn hook_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Paths altered by auto-fixing hooks, deduplicated, first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModifiedFileSet(IndexSet<String>);

impl ModifiedFileSet {
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.0.insert(path.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Hook counters; `passed + failed + skipped == total_hooks`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_hooks: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn record(&mut self, status: HookStatus) {
        self.total_hooks += 1;
        match status {
            HookStatus::Passed => self.passed += 1,
            HookStatus::Failed => self.failed += 1,
            HookStatus::Skipped => self.skipped += 1,
        }
    }
}

/// The externally visible result of one `pre_commit_run` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: RunOutcome,
    pub summary: Summary,
    pub failures: FailureGroup,
    pub modified_files: ModifiedFileSet,
    /// Seconds
    pub execution_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Assemble a report from a classified outcome and normalized output
    ///
    /// A zero exit code cannot vouch for hooks the parser saw fail, so such a
    /// run is reported as `hooks_failed`.
    pub fn build(outcome: RunOutcome, normalized: Normalized, elapsed: Duration) -> Self {
        let status = match outcome {
            RunOutcome::Success if !normalized.failures.is_empty() => RunOutcome::HooksFailed,
            other => other,
        };

        Self {
            status,
            summary: normalized.summary,
            failures: normalized.failures,
            modified_files: normalized.modified_files,
            execution_time: elapsed.as_secs_f64(),
            message: None,
            warnings: normalized.warnings,
        }
    }

    /// A system error report for a run that never reached the runner
    pub fn system_error(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status: RunOutcome::SystemError,
            summary: Summary::default(),
            failures: FailureGroup::default(),
            modified_files: ModifiedFileSet::default(),
            execution_time: elapsed.as_secs_f64(),
            message: Some(message.into()),
            warnings: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}

/// Short human-readable explanation of a report's status
pub fn describe(
    status: RunOutcome,
    exit_code: Option<i32>,
    output: &str,
    failures: &FailureGroup,
    budget: Duration,
) -> Option<String> {
    match status {
        RunOutcome::Success => None,
        RunOutcome::Timeout => Some(format!(
            "pre-commit execution exceeded {} seconds",
            budget.as_secs_f64()
        )),
        RunOutcome::HooksFailed if failures.is_empty() => Some(format!(
            "Hook runner exited with code {} but no failing hook sections were recognized",
            exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
        )),
        RunOutcome::HooksFailed => {
            let ids: Vec<&str> = failures.hook_ids().collect();
            Some(format!("{} hook(s) failed: {}", ids.len(), ids.join(", ")))
        }
        RunOutcome::SystemError => Some(match crash_signature(output) {
            Some(line) => format!("Hook runner reported an error: {line}"),
            None => match exit_code {
                Some(code) => format!("Hook runner exited with unexpected code {code}"),
                None => "Hook runner was terminated by a signal".to_string(),
            },
        }),
    }
}
