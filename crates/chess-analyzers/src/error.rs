//! Per-game annotation error.

use chess_core::{ClockParseError, ReplayError, TimeControlError};
use thiserror::Error;

/// Why a game could not be annotated. A game either annotates completely or
/// fails with exactly one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    TimeControl(#[from] TimeControlError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Clock(#[from] ClockParseError),

    #[error("ply {ply}: piece inventory does not match the recorded capture")]
    InventoryMismatch { ply: usize },
}

impl GameError {
    /// 1-based ply the failure is attributed to, when there is one.
    pub fn ply(&self) -> Option<usize> {
        match self {
            GameError::TimeControl(_) => None,
            GameError::Replay(e) => e.ply(),
            GameError::Clock(e) => Some(e.ply()),
            GameError::InventoryMismatch { ply } => Some(*ply),
        }
    }

    /// Short machine-readable kind for reporting.
    pub fn kind(&self) -> &'static str {
        use chess_core::MoveError;
        match self {
            GameError::TimeControl(_) => "time_control",
            GameError::Replay(ReplayError::Position(_)) => "malformed_position",
            GameError::Replay(ReplayError::Move { source, .. }) => match source {
                MoveError::UnknownNotation(_) => "unknown_notation",
                MoveError::IllegalMove { .. } => "illegal_move",
                MoveError::AmbiguousMove { .. } => "ambiguous_move",
            },
            GameError::Clock(_) => "clock_parse",
            GameError::InventoryMismatch { .. } => "inventory_mismatch",
        }
    }
}
