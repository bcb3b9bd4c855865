//! Pieces delivering checkmate.
//!
//! The escape set is the mated king's square plus every square it attacks
//! that is not occupied by its own side. Attackers of the winning colour on
//! any escape square are unioned by board square, so one piece covering
//! several escape squares is reported once while two pieces of the same type
//! are reported twice.

use chess_core::attacks::{attackers, king_attacks};
use chess_core::{Board, Color, Role, SquareSet};
use tracing::warn;

use crate::analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
use crate::error::GameError;

/// King square plus the squares the king could try to flee to.
pub fn escape_squares(board: &Board, checkmated: Color) -> SquareSet {
    let king = match board.king_square(checkmated) {
        Some(sq) => sq,
        None => return SquareSet::EMPTY,
    };
    let mut escape = SquareSet::from_square(king);
    for sq in king_attacks(king) {
        match board.piece_at(sq) {
            Some(p) if p.color == checkmated => {}
            _ => escape.insert(sq),
        }
    }
    escape
}

/// Role names of the winning side's pieces covering the escape set, sorted.
pub fn checkmate_attackers(board: &Board, checkmated: Color) -> Vec<Role> {
    let winner = !checkmated;
    let mut covering = SquareSet::EMPTY;
    for sq in escape_squares(board, checkmated) {
        covering |= attackers(board, winner, sq);
    }

    let mut roles: Vec<Role> = covering
        .iter()
        .filter_map(|sq| board.piece_at(sq))
        .map(|p| p.role)
        .collect();
    roles.sort_by_key(|role| role.name());
    roles
}

/// Attackers for the final ply when the result says someone was mated and
/// the board agrees; empty otherwise.
pub fn terminal_attackers(ctx: &PlyContext) -> Vec<Role> {
    let checkmated = match (ctx.is_final, ctx.checkmated) {
        (true, Some(color)) => color,
        _ => return Vec::new(),
    };
    let board = ctx.after();
    if !ctx.ply.is_checkmate || board.side_to_move() != checkmated {
        warn!(
            ply = ctx.ply.index,
            checkmated = %checkmated,
            fen = %board,
            "result reports checkmate but the final position is not mate"
        );
        return Vec::new();
    }
    checkmate_attackers(board, checkmated)
}

pub struct CheckmateAnnotator;

impl PlyAnnotator for CheckmateAnnotator {
    fn name(&self) -> &'static str {
        "checkmate"
    }

    fn annotate(&self, ctx: &PlyContext, annotation: &mut Annotation) -> Result<(), GameError> {
        annotation.checkmate_attackers = terminal_attackers(ctx);
        Ok(())
    }
}
