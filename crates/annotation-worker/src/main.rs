//! Annotation worker
//!
//! Reads finished games as JSON lines, replays and annotates each one, and
//! writes one JSON line per game.

use annotation_worker::config::WorkerConfig;
use annotation_worker::job;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let config = WorkerConfig::load()?;
    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        workers = config.workers,
        "Worker config loaded"
    );

    let summary = job::run(&config).await?;
    info!(
        games = summary.games,
        annotated = summary.annotated,
        failed = summary.failed,
        "Done"
    );

    Ok(())
}
