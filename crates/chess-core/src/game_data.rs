use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeControlError;
use crate::pgn::{self, RecordedMove};
use crate::time_control::{TimeClass, TimeControl};
use crate::types::Color;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResult {
    pub username: String,
    #[serde(default)]
    pub rating: Option<i32>,
    pub result: String, // "win", "checkmated", "resigned", "timeout", "stalemate", ...
}

/// A finished game as delivered by the ingestion side (Chess.com archive shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub uuid: String,
    #[serde(default)]
    pub url: Option<String>,
    pub pgn: String,
    pub time_control: String,
    #[serde(default)]
    pub time_class: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub initial_setup: Option<String>,
    pub white: PlayerResult,
    pub black: PlayerResult,
}

impl GameRecord {
    /// Parse one line of a JSON-lines game dump.
    pub fn from_json(line: &str) -> Result<GameRecord, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Side whose result is `checkmated`, if any.
    pub fn checkmated_color(&self) -> Option<Color> {
        if self.white.result == "checkmated" {
            Some(Color::White)
        } else if self.black.result == "checkmated" {
            Some(Color::Black)
        } else {
            None
        }
    }
}

/// Everything replay and annotation need for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInput {
    pub game_id: String,
    /// `None` means the standard initial position.
    pub start_position: Option<String>,
    pub moves: Vec<RecordedMove>,
    pub time_control: TimeControl,
    pub checkmated: Option<Color>,
}

impl GameInput {
    pub fn from_record(record: &GameRecord) -> Result<GameInput, TimeControlError> {
        let class = record
            .time_class
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::parse::<TimeClass>)
            .transpose()?;
        let time_control = TimeControl::parse(&record.time_control, class)?;

        let parsed = pgn::parse_pgn(&record.pgn);
        let start_position = record
            .initial_setup
            .clone()
            .filter(|fen| !fen.is_empty())
            .or(parsed.start_fen);

        Ok(GameInput {
            game_id: record.uuid.clone(),
            start_position,
            moves: parsed.moves,
            time_control,
            checkmated: record.checkmated_color(),
        })
    }

    pub fn sans(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.san.as_str()).collect()
    }
}
