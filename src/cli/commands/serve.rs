use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Override the hook runner timeout (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn execute(args: ServeArgs, custom_config: Option<&Path>) -> Result<()> {
    use crate::mcp::McpServer;
    use tokio::io::{BufReader, stdin, stdout};

    let mut config = super::load_config(custom_config)?;
    if let Some(secs) = args.timeout {
        config.runner.timeout_secs = secs;
        config.validate()?;
    }

    tracing::info!(
        "Serving with runner '{}' (timeout {}s)",
        config.runner.executable,
        config.runner.timeout_secs
    );

    McpServer::new(&config)
        .serve(BufReader::new(stdin()), stdout())
        .await
}
