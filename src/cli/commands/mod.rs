use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod config;
pub mod run;
pub mod serve;
pub mod version;

#[derive(Parser)]
#[command(
    name = "pre-commit-mcp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run pre-commit on staged changes and return structured reports",
    long_about = "pre-commit-mcp exposes a single MCP tool, pre_commit_run, that executes the \
                  pre-commit hook runner on the staged files of the enclosing git repository \
                  and returns a compact JSON report: status, hook counts, failures grouped by \
                  hook id, and files modified by auto-fixers."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true, env = "PRE_COMMIT_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the pre_commit_run tool over stdio (default)
    Serve(serve::ServeArgs),
    /// Run pre-commit once and print the report
    Run(run::RunArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Change directory if specified
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        // Logs go to stderr; stdout is reserved for reports and the protocol
        setup_logging(self.verbose, self.quiet);

        let config_path = self.config.as_deref();
        match self.command {
            Some(Commands::Serve(args)) => serve::execute(args, config_path).await,
            Some(Commands::Run(args)) => run::execute(args, config_path, self.quiet).await,
            Some(Commands::Config(args)) => config::execute(args, config_path, self.quiet).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => serve::execute(serve::ServeArgs::default(), config_path).await,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<crate::config::Config> {
    crate::config::Config::load(path)
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
