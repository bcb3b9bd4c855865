//! Attack geometry, recomputed from the board snapshot on every call.
//!
//! `attacked_squares` includes squares occupied by friendly pieces, so it
//! serves defence and fork analysis as well as capture generation.

use crate::board::Board;
use crate::square_set::SquareSet;
use crate::types::{Color, Piece, Role, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

fn step_attacks(sq: Square, offsets: &[(i8, i8)]) -> SquareSet {
    offsets
        .iter()
        .filter_map(|&(df, dr)| sq.offset(df, dr))
        .collect()
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    step_attacks(sq, &KNIGHT_OFFSETS)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    step_attacks(sq, &KING_OFFSETS)
}

/// Diagonal capture squares of a pawn of `color` standing on `sq`.
pub fn pawn_attacks(color: Color, sq: Square) -> SquareSet {
    let dr = color.pawn_direction();
    step_attacks(sq, &[(-1, dr), (1, dr)])
}

/// Rays from `sq` along `directions`, each stopping at (and including) the
/// first occupied square.
pub fn slider_attacks(board: &Board, sq: Square, directions: &[(i8, i8)]) -> SquareSet {
    let mut result = SquareSet::EMPTY;
    for &(df, dr) in directions {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(df, dr) {
            result.insert(next);
            if board.piece_at(next).is_some() {
                break;
            }
            cursor = next;
        }
    }
    result
}

/// Squares `piece` would attack if it stood on `sq` in this position.
pub fn piece_attacks(board: &Board, sq: Square, piece: Piece) -> SquareSet {
    match piece.role {
        Role::Pawn => pawn_attacks(piece.color, sq),
        Role::Knight => knight_attacks(sq),
        Role::King => king_attacks(sq),
        Role::Bishop => slider_attacks(board, sq, &DIAGONAL),
        Role::Rook => slider_attacks(board, sq, &ORTHOGONAL),
        Role::Queen => {
            slider_attacks(board, sq, &DIAGONAL) | slider_attacks(board, sq, &ORTHOGONAL)
        }
    }
}

/// Squares the piece on `sq` attacks; empty when the square is empty.
pub fn attacked_squares(board: &Board, sq: Square) -> SquareSet {
    match board.piece_at(sq) {
        Some(piece) => piece_attacks(board, sq, piece),
        None => SquareSet::EMPTY,
    }
}

/// Squares holding a piece of `color` that attacks `target`.
///
/// Uses reverse lookup: a piece of role R attacks `target` exactly when an R
/// standing on `target` would attack the piece's square.
pub fn attackers(board: &Board, color: Color, target: Square) -> SquareSet {
    let diagonal = slider_attacks(board, target, &DIAGONAL);
    let orthogonal = slider_attacks(board, target, &ORTHOGONAL);

    let mut result = SquareSet::EMPTY;
    // A pawn of `color` attacks target iff a pawn of the other colour on
    // target would attack the pawn's square.
    result |= pawn_attacks(!color, target) & board.pieces_of(color, Role::Pawn);
    result |= knight_attacks(target) & board.pieces_of(color, Role::Knight);
    result |= king_attacks(target) & board.pieces_of(color, Role::King);
    result |= diagonal
        & (board.pieces_of(color, Role::Bishop) | board.pieces_of(color, Role::Queen));
    result |= orthogonal
        & (board.pieces_of(color, Role::Rook) | board.pieces_of(color, Role::Queen));
    result
}

pub fn is_attacked(board: &Board, by: Color, target: Square) -> bool {
    !attackers(board, by, target).is_empty()
}
