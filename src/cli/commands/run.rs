use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::Path;

#[derive(Args)]
pub struct RunArgs {
    /// Run even when not inside a git repository
    #[arg(long)]
    pub force_non_git: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,

    /// Override the hook runner timeout (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
}

/// Exit code for any status other than success
const EXIT_NOT_SUCCESS: i32 = 1;

/// Exit code when no report could be produced
const EXIT_HARD_FAILURE: i32 = 2;

pub async fn execute(args: RunArgs, custom_config: Option<&Path>, quiet: bool) -> Result<()> {
    use crate::cli::Output;
    use crate::pipeline::{PreCommitPipeline, RunRequest};
    use crate::report::RunOutcome;

    let output = Output::new(quiet);
    let mut config = super::load_config(custom_config)?;
    if let Some(secs) = args.timeout {
        config.runner.timeout_secs = secs;
        config.validate()?;
    }

    let request = RunRequest {
        force_non_git: args.force_non_git,
    };

    let report = match PreCommitPipeline::new(&config).run(request).await {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!("Pipeline failed: {:?}", e);
            match args.format {
                ReportFormat::Json => {
                    let body = serde_json::json!({
                        "status": e.status(),
                        "error": e.summary(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                ReportFormat::Text => output.error(&e.summary()),
            }
            std::process::exit(EXIT_HARD_FAILURE);
        }
    };

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => output.report(&report),
    }

    if report.status != RunOutcome::Success {
        std::process::exit(EXIT_NOT_SUCCESS);
    }

    Ok(())
}
