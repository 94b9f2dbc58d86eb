//! The `pre_commit_run` operation
//!
//! Strictly sequential: locate the repository, run the hook runner, classify
//! the outcome, normalize the output, assemble the report. Every value is
//! scoped to one call; the only shared input is the configuration captured at
//! construction.

use crate::config::Config;
use crate::error::PipelineError;
use crate::git;
use crate::report::{self, Normalizer, RunReport};
use crate::runner::ProcessInvoker;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};


/// Arguments of one `pre_commit_run` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunRequest {
    /// Run even when no git repository encloses the working directory
    pub force_non_git: bool,
}

/// Runs pre-commit and produces a [`RunReport`]
#[derive(Debug, Clone)]
pub struct PreCommitPipeline {
    invoker: ProcessInvoker,
    normalizer: Normalizer,
    config_file: String,
    require_config: bool,
    workdir: Option<PathBuf>,
}

impl PreCommitPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            invoker: ProcessInvoker::from_config(&config.runner),
            normalizer: Normalizer::from_config(&config.report),
            config_file: config.runner.config_file.clone(),
            require_config: config.runner.require_config,
            workdir: None,
        }
    }

    /// Start repository discovery from `dir` instead of the process's
    /// current directory
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Override the execution budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.invoker = self.invoker.with_timeout(timeout);
        self
    }

    pub async fn run(&self, request: RunRequest) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let context = match &self.workdir {
            Some(dir) => git::locate_from(dir, request.force_non_git)?,
            None => git::locate(request.force_non_git)?,
        };

        if self.require_config && !context.has_runner_config(&self.config_file) {
            warn!(
                "{} missing in {}, not launching the hook runner",
                self.config_file,
                context.workdir().display()
            );
            return Ok(RunReport::system_error(
                format!(
                    "No {} found in {}",
                    self.config_file,
                    context.workdir().display()
                ),
                started.elapsed(),
            ));
        }

        let raw = self.invoker.invoke(&context).await?;
        let outcome = report::classify(&raw);
        let normalized = self.normalizer.normalize(&raw.combined_output);
        let report = RunReport::build(outcome, normalized, started.elapsed());
        let message = report::describe(
            report.status,
            raw.exit_code,
            &raw.combined_output,
            &report.failures,
            self.invoker.timeout(),
        );

        info!(
            "pre-commit finished: status={} total={} passed={} failed={} skipped={} modified={} in {:.2}s",
            report.status,
            report.summary.total_hooks,
            report.summary.passed,
            report.summary.failed,
            report.summary.skipped,
            report.modified_files.len(),
            report.execution_time
        );

        Ok(report.with_message(message))
    }
}
