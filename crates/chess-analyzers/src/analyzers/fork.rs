//! Fork detection: the piece that just moved attacks two or more opponent
//! non-pawn pieces (the king included) from its destination square.

use chess_core::attacks::attacked_squares;
use chess_core::{Board, Piece, Role, Square};

use crate::analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
use crate::error::GameError;

const MIN_FORK_TARGETS: usize = 2;

/// Opponent non-pawn pieces attacked from `to`, in square order; empty when
/// fewer than two. The forking piece itself may be of any type.
pub fn forked_pieces(board: &Board, to: Square) -> Vec<Piece> {
    let mover = match board.piece_at(to) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let targets: Vec<Piece> = attacked_squares(board, to)
        .iter()
        .filter_map(|sq| board.piece_at(sq))
        .filter(|p| p.color != mover.color && p.role != Role::Pawn)
        .collect();

    if targets.len() < MIN_FORK_TARGETS {
        return Vec::new();
    }
    targets
}

pub struct ForkAnnotator;

impl PlyAnnotator for ForkAnnotator {
    fn name(&self) -> &'static str {
        "fork"
    }

    fn annotate(&self, ctx: &PlyContext, annotation: &mut Annotation) -> Result<(), GameError> {
        annotation.forked_pieces = forked_pieces(ctx.after(), ctx.ply.to);
        Ok(())
    }
}
