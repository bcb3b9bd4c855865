//! Batch annotation: read game records, annotate them in parallel, write one
//! outcome per game in input order.

use std::path::Path;
use std::sync::Arc;

use chess_analyzers::{annotate_game, GameError};
use chess_core::game_data::{GameInput, GameRecord};
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::output::GameOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub games: usize,
    pub annotated: usize,
    pub failed: usize,
}

/// Annotate one input line. Never fails: a bad record becomes a failed outcome.
pub fn annotate_line(line: &str, line_no: usize, include_fen: bool) -> GameOutcome {
    let record = match GameRecord::from_json(line) {
        Ok(record) => record,
        Err(e) => {
            let game_id = record_id(line, line_no);
            warn!(line_no, game_id = %game_id, error = %e, "Unreadable game record");
            return GameOutcome::unreadable(game_id, e);
        }
    };

    let input = match GameInput::from_record(&record) {
        Ok(input) => input,
        Err(e) => {
            let err = GameError::from(e);
            error!(game_id = %record.uuid, error = %err, "Annotation failed");
            return GameOutcome::failed(record.uuid, &err);
        }
    };

    match annotate_game(&input) {
        Ok(game) => {
            info!(game_id = %game.game_id, plies = game.plies.len(), "Annotation complete");
            GameOutcome::annotated(&game, include_fen)
        }
        Err(e) => {
            error!(game_id = %input.game_id, ply = ?e.ply(), error = %e, "Annotation failed");
            GameOutcome::failed(input.game_id, &e)
        }
    }
}

/// Best-effort game id for a line: its `uuid` field, else `line-N`.
fn record_id(line: &str, line_no: usize) -> String {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("uuid").and_then(|u| u.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("line-{line_no}"))
}

/// Turn a finished annotation task into its outcome. A task that panicked
/// fails only its own game.
fn joined_outcome(
    joined: Result<GameOutcome, JoinError>,
    line: &str,
    line_no: usize,
) -> GameOutcome {
    joined.unwrap_or_else(|e| {
        let game_id = record_id(line, line_no);
        error!(line_no, game_id = %game_id, error = %e, "Annotation task aborted");
        GameOutcome::aborted(game_id, e)
    })
}

/// Annotate `(line_no, line)` pairs with at most `workers` games in flight.
/// Outcomes come back in the order of `lines`.
pub async fn annotate_lines(
    lines: Vec<(usize, String)>,
    workers: usize,
    include_fen: bool,
) -> Result<Vec<GameOutcome>, WorkerError> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(lines.len());

    for (line_no, line) in lines {
        let line: Arc<str> = line.into();
        let permit = semaphore.clone().acquire_owned().await?;
        let task_line = Arc::clone(&line);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit; // Hold until done
            annotate_line(&task_line, line_no, include_fen)
        });
        handles.push((line_no, line, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (line_no, line, handle) in handles {
        outcomes.push(joined_outcome(handle.await, &line, line_no));
    }
    Ok(outcomes)
}

/// Read the input file, annotate every game and write the output file.
pub async fn run(config: &WorkerConfig) -> Result<RunSummary, WorkerError> {
    let text = tokio::fs::read_to_string(&config.input).await?;
    let lines: Vec<(usize, String)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect();

    info!(
        games = lines.len(),
        workers = config.workers,
        input = %config.input.display(),
        "Annotating games"
    );

    let outcomes = annotate_lines(lines, config.workers, config.include_fen).await?;
    write_outcomes(&config.output, &outcomes).await?;

    let annotated = outcomes.iter().filter(|o| o.is_ok()).count();
    Ok(RunSummary {
        games: outcomes.len(),
        annotated,
        failed: outcomes.len() - annotated,
    })
}

async fn write_outcomes(path: &Path, outcomes: &[GameOutcome]) -> Result<(), WorkerError> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = tokio::io::BufWriter::new(file);
    for outcome in outcomes {
        let mut line = serde_json::to_vec(outcome)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
    }
    writer.flush().await?;
    Ok(())
}
