//! Game phase from the count of knights, bishops, rooks and queens.

use chess_core::{Board, Color, Square};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
use crate::error::GameError;

pub const ENDGAME_MAX_PIECES: usize = 6;
pub const MIDGAME_MAX_PIECES: usize = 10;
/// A back rank holding fewer major/minor pieces than this is sparse.
pub const BACKRANK_MIN_PIECES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Opening,
    Midgame,
    Endgame,
}

impl GamePhase {
    pub fn name(self) -> &'static str {
        match self {
            GamePhase::Opening => "Opening",
            GamePhase::Midgame => "Midgame",
            GamePhase::Endgame => "Endgame",
        }
    }
}

/// Knights, bishops, rooks and queens of both colours.
pub fn major_minor_count(board: &Board) -> usize {
    board
        .pieces()
        .filter(|(_, piece)| piece.role.is_major_minor())
        .count()
}

fn backrank_count(board: &Board, color: Color) -> usize {
    (0..8)
        .filter_map(|file| Square::from_coords(file, color.back_rank() as i8))
        .filter_map(|sq| board.piece_at(sq))
        .filter(|piece| piece.color == color && piece.role.is_major_minor())
        .count()
}

/// Either side has fewer than four major/minor pieces left on its own back rank.
pub fn is_backrank_sparse(board: &Board) -> bool {
    Color::ALL
        .iter()
        .any(|&color| backrank_count(board, color) < BACKRANK_MIN_PIECES)
}

pub fn classify(board: &Board) -> GamePhase {
    let count = major_minor_count(board);
    if count <= ENDGAME_MAX_PIECES {
        GamePhase::Endgame
    } else if count <= MIDGAME_MAX_PIECES || is_backrank_sparse(board) {
        GamePhase::Midgame
    } else {
        GamePhase::Opening
    }
}

/// Phase of the position after each ply.
pub struct PhaseAnnotator;

impl PlyAnnotator for PhaseAnnotator {
    fn name(&self) -> &'static str {
        "phase"
    }

    fn annotate(&self, ctx: &PlyContext, annotation: &mut Annotation) -> Result<(), GameError> {
        let board = ctx.after();
        annotation.major_minor_count = major_minor_count(board);
        annotation.backrank_sparse = is_backrank_sparse(board);
        annotation.phase = classify(board);
        Ok(())
    }
}
