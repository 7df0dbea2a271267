use clap::Parser;
use pomfind::{Cli, Fetcher, Outcome, Resolver, StdoutSink, driver};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries results only
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let fetcher = match cli.fetch_config().await.and_then(Fetcher::new) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("{}", e);
            return Outcome::Unreadable.exit_code();
        }
    };

    let resolver = Resolver::new(cli.resolve_options(), fetcher, Arc::new(StdoutSink));
    let stdin = BufReader::new(tokio::io::stdin());

    driver::run(stdin, &resolver, cli.exit_code)
        .await
        .exit_code()
}
