//! Error types for position parsing, move resolution and replay.

use thiserror::Error;

/// A position string that cannot be parsed into a [`Board`](crate::board::Board).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("malformed position: expected 6 fields, found {0}")]
    FieldCount(usize),

    #[error("malformed position: {0}")]
    Placement(String),

    #[error("malformed position: {0}")]
    PieceCount(String),

    #[error("malformed position: invalid side to move {0:?}")]
    SideToMove(String),

    #[error("malformed position: invalid castling field {0:?}")]
    Castling(String),

    #[error("malformed position: invalid en passant field {0:?}")]
    EnPassant(String),

    #[error("malformed position: invalid move counter {0:?}")]
    Counter(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("unknown notation {0:?}")]
    UnknownNotation(String),

    #[error("illegal move {san} in {fen}")]
    IllegalMove { san: String, fen: String },

    #[error("ambiguous move {san} in {fen} ({candidates} candidates)")]
    AmbiguousMove {
        san: String,
        fen: String,
        candidates: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("ply {ply} ({san}): {source}")]
    Move {
        ply: usize,
        san: String,
        #[source]
        source: MoveError,
    },
}

impl ReplayError {
    /// 1-based ply the replay stopped at, if it got past the start position.
    pub fn ply(&self) -> Option<usize> {
        match self {
            ReplayError::Position(_) => None,
            ReplayError::Move { ply, .. } => Some(*ply),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockParseError {
    #[error("ply {ply}: malformed clock token {token:?}")]
    Malformed { ply: usize, token: String },

    #[error("ply {ply}: missing clock for a timed game")]
    Missing { ply: usize },
}

impl ClockParseError {
    pub fn ply(&self) -> usize {
        match self {
            ClockParseError::Malformed { ply, .. } | ClockParseError::Missing { ply } => *ply,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeControlError {
    #[error("invalid time control {0:?}")]
    Format(String),

    #[error("unknown time class {0:?}")]
    Class(String),
}
