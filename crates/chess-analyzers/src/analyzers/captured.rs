//! Captured piece, cross-checked against the change in piece inventory
//! between consecutive snapshots.

use chess_core::{Board, Color, Piece, Role};

use crate::analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
use crate::error::GameError;

/// Piece counts indexed by `[color][role]`.
pub type Inventory = [[u8; 6]; 2];

pub fn inventory(board: &Board) -> Inventory {
    let mut counts = [[0u8; 6]; 2];
    for (_, piece) in board.pieces() {
        counts[piece.color.index()][piece.role.index()] += 1;
    }
    counts
}

/// Multiset difference `before - after`: pieces that disappeared.
pub fn removed_pieces(before: &Board, after: &Board) -> Vec<Piece> {
    let (prev, curr) = (inventory(before), inventory(after));
    let mut removed = Vec::new();
    for color in Color::ALL {
        for role in Role::ALL {
            let (p, c) = (prev[color.index()][role.index()], curr[color.index()][role.index()]);
            for _ in c..p {
                removed.push(Piece::new(color, role));
            }
        }
    }
    removed
}

/// The piece this ply captured, verified against the inventories: the board
/// after must hold exactly the board before, minus the captured piece, with a
/// promoting pawn swapped for its new role.
pub fn captured_piece(ctx: &PlyContext) -> Result<Option<Piece>, GameError> {
    let ply = ctx.ply;
    let mut expected = inventory(ctx.before);

    if let Some(captured) = ply.captured {
        let slot = &mut expected[captured.color.index()][captured.role.index()];
        *slot = slot
            .checked_sub(1)
            .ok_or(GameError::InventoryMismatch { ply: ply.index })?;
    }
    if let Some(role) = ply.promotion {
        let mover = ply.color.index();
        let pawns = &mut expected[mover][Role::Pawn.index()];
        *pawns = pawns
            .checked_sub(1)
            .ok_or(GameError::InventoryMismatch { ply: ply.index })?;
        expected[mover][role.index()] += 1;
    }

    if expected != inventory(ctx.after()) {
        return Err(GameError::InventoryMismatch { ply: ply.index });
    }
    Ok(ply.captured)
}

pub struct CapturedAnnotator;

impl PlyAnnotator for CapturedAnnotator {
    fn name(&self) -> &'static str {
        "captured"
    }

    fn annotate(&self, ctx: &PlyContext, annotation: &mut Annotation) -> Result<(), GameError> {
        annotation.captured = captured_piece(ctx)?;
        Ok(())
    }
}
