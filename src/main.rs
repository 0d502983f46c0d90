use clap::Parser;
use ley_rag_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Snapshot(args) => cli::snapshot::run(args).await,
    }
}
