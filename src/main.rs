use anyhow::Result;
use clap::Parser;
use pre_commit_mcp::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
