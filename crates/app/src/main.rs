#![forbid(unsafe_code)]

use std::time::Duration;

use clap::Parser;
use services::{AppServices, Clock, SessionConfig};

mod cli;
mod commands;
mod db_url;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("learnify error: {error:#}");
        std::process::exit(2);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose)?;

    // Opening and migrating SQLite stays in the binary glue.
    let db_url = db_url::normalize_sqlite_url(&cli.db_url);
    db_url::prepare_sqlite_file(&db_url)?;
    let config = SessionConfig::default().with_latency(Duration::from_millis(cli.latency_ms));
    let app = AppServices::new_sqlite(&db_url, config, Clock::default()).await?;

    let mut session = app.session_store();
    session.load_session().await;

    commands::dispatch(cli.command, &app, &mut session).await
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("LEARNIFY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
