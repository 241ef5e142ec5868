use clap::Parser;
use opensidewalkmap::cli::{Cli, Command, run_search};
use opensidewalkmap::{Config, MapServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from(&cli.options);

    match cli.command {
        Some(Command::Search(args)) => run_search(config, args).await,
        Some(Command::Serve) | None => MapServer::new(config)?.start().await,
    }
}
