//! Output rows: one JSON line per game, either annotated or failed.

use chess_analyzers::{AnnotatedGame, Annotation, ClockUsage, GameError, GamePhase};
use chess_core::{Color, Piece, Ply, Role, Square};
use serde::Serialize;

/// One ply with its annotation, flattened into a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlyRow {
    pub ply: usize,
    pub move_number: u32,
    pub color: Color,
    pub san: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
    pub from: Square,
    pub to: Square,
    pub moved: Piece,
    pub promotion: Option<Role>,
    pub captured: Option<Piece>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub forked_pieces: Vec<Piece>,
    pub checkmate_attackers: Vec<Role>,
    pub major_minor_count: usize,
    pub backrank_sparse: bool,
    pub phase: GamePhase,
    #[serde(flatten)]
    pub clock: ClockUsage,
}

impl PlyRow {
    pub fn new(ply: &Ply, annotation: &Annotation, include_fen: bool) -> Self {
        Self {
            ply: ply.index,
            move_number: ply.move_number,
            color: ply.color,
            san: ply.san.clone(),
            fen: include_fen.then(|| ply.board.to_fen()),
            from: ply.from,
            to: ply.to,
            moved: ply.moved,
            promotion: ply.promotion,
            captured: annotation.captured,
            is_check: ply.is_check,
            is_checkmate: ply.is_checkmate,
            forked_pieces: annotation.forked_pieces.clone(),
            checkmate_attackers: annotation.checkmate_attackers.clone(),
            major_minor_count: annotation.major_minor_count,
            backrank_sparse: annotation.backrank_sparse,
            phase: annotation.phase,
            clock: annotation.clock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GameOutcome {
    Ok {
        game_id: String,
        plies: Vec<PlyRow>,
    },
    Failed {
        game_id: String,
        ply: Option<usize>,
        kind: String,
        error: String,
    },
}

impl GameOutcome {
    pub fn annotated(game: &AnnotatedGame, include_fen: bool) -> Self {
        GameOutcome::Ok {
            game_id: game.game_id.clone(),
            plies: game
                .rows()
                .map(|(ply, annotation)| PlyRow::new(ply, annotation, include_fen))
                .collect(),
        }
    }

    pub fn failed(game_id: impl Into<String>, err: &GameError) -> Self {
        GameOutcome::Failed {
            game_id: game_id.into(),
            ply: err.ply(),
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }

    /// A line that could not be read as a game record at all.
    pub fn unreadable(game_id: impl Into<String>, error: impl ToString) -> Self {
        GameOutcome::Failed {
            game_id: game_id.into(),
            ply: None,
            kind: "invalid_record".to_string(),
            error: error.to_string(),
        }
    }

    /// A game whose annotation task panicked or was cancelled.
    pub fn aborted(game_id: impl Into<String>, error: impl ToString) -> Self {
        GameOutcome::Failed {
            game_id: game_id.into(),
            ply: None,
            kind: "task_aborted".to_string(),
            error: error.to_string(),
        }
    }

    pub fn game_id(&self) -> &str {
        match self {
            GameOutcome::Ok { game_id, .. } | GameOutcome::Failed { game_id, .. } => game_id,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GameOutcome::Ok { .. })
    }
}
