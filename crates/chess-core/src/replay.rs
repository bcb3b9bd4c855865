//! Ply-by-ply replay of a recorded game.
//!
//! One board is threaded forward per ply; every ply keeps its own snapshot so
//! later analysis can re-read any earlier position.

use serde::Serialize;

use crate::board::Board;
use crate::error::ReplayError;
use crate::movegen::MoveKind;
use crate::san::{AppliedMove, Suffix};
use crate::types::{Color, Piece, Role, Square};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ply {
    /// 1-based half-move index.
    pub index: usize,
    /// Move number shared by the white and black halves.
    pub move_number: u32,
    pub color: Color,
    pub san: String,
    /// Position after this ply.
    #[serde(rename = "fen")]
    pub board: Board,
    pub from: Square,
    pub to: Square,
    /// Piece that left `from` (the pawn, for promotions).
    pub moved: Piece,
    pub promotion: Option<Role>,
    pub captured: Option<Piece>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_castle: bool,
    pub is_en_passant: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub start: Board,
    pub plies: Vec<Ply>,
}

impl Replay {
    /// Position before ply `i` (0-based into `plies`).
    pub fn board_before(&self, i: usize) -> &Board {
        match i.checked_sub(1).and_then(|prev| self.plies.get(prev)) {
            Some(ply) => &ply.board,
            None => &self.start,
        }
    }

    pub fn final_board(&self) -> &Board {
        self.plies.last().map(|ply| &ply.board).unwrap_or(&self.start)
    }
}

/// Replay `moves` from `start_position` (the standard initial position when
/// `None`). The first failing move aborts the whole game.
pub fn replay<S: AsRef<str>>(
    start_position: Option<&str>,
    moves: &[S],
) -> Result<Replay, ReplayError> {
    let start = match start_position {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::default(),
    };

    let mut plies = Vec::with_capacity(moves.len());
    let mut board = start.clone();

    for (i, text) in moves.iter().enumerate() {
        let san = text.as_ref();
        let index = i + 1;
        let AppliedMove {
            mv,
            board: next,
            status,
        } = board
            .apply_san(san)
            .map_err(|source| ReplayError::Move {
                ply: index,
                san: san.to_string(),
                source,
            })?;

        // The replayed move supplies from/to; the pieces are read off the
        // snapshot before the move.
        let moved = board.piece_at(mv.from).unwrap_or(mv.piece);
        let captured = if mv.kind == MoveKind::EnPassant {
            board.piece_at(mv.capture_square())
        } else {
            board.piece_at(mv.to)
        };

        plies.push(Ply {
            index,
            move_number: board.fullmove_number(),
            color: board.side_to_move(),
            san: san.to_string(),
            is_check: status.is_some(),
            is_checkmate: status == Some(Suffix::Checkmate),
            board: next.clone(),
            from: mv.from,
            to: mv.to,
            moved,
            promotion: mv.promotion,
            captured,
            is_castle: matches!(mv.kind, MoveKind::Castle(_)),
            is_en_passant: mv.kind == MoveKind::EnPassant,
        });
        board = next;
    }

    Ok(Replay { start, plies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;

    #[test]
    fn test_replay_from_standard_start() {
        let replay = replay(None, &["e4", "e5", "Nf3"]).unwrap();
        assert_eq!(replay.plies.len(), 3);

        let third = &replay.plies[2];
        assert_eq!(third.index, 3);
        assert_eq!(third.move_number, 2);
        assert_eq!(third.color, Color::White);
        assert_eq!(third.from.to_string(), "g1");
        assert_eq!(third.to.to_string(), "f3");
        assert_eq!(third.moved, Piece::new(Color::White, Role::Knight));
        assert_eq!(
            third.board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
        assert_eq!(replay.board_before(0), &Board::default());
        assert_eq!(replay.board_before(2), &replay.plies[1].board);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let replay = replay(None, &["d4", "d5"]).unwrap();
        assert_ne!(replay.plies[0].board, replay.plies[1].board);
        assert_eq!(
            replay.plies[0].board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 1"
        );
    }

    #[test]
    fn test_en_passant_capture_recorded() {
        let replay = replay(None, &["e4", "a6", "e5", "d5", "exd6"]).unwrap();
        let last = replay.plies.last().unwrap();
        assert!(last.is_en_passant);
        assert_eq!(last.captured, Some(Piece::new(Color::Black, Role::Pawn)));
        assert_eq!(last.to.to_string(), "d6");
    }

    #[test]
    fn test_promotion_records_pawn_as_moved() {
        let replay = replay(Some("8/4P3/8/8/8/8/k7/4K3 w - - 0 1"), &["e8=Q"]).unwrap();
        let ply = &replay.plies[0];
        assert_eq!(ply.moved, Piece::new(Color::White, Role::Pawn));
        assert_eq!(ply.promotion, Some(Role::Queen));
    }

    #[test]
    fn test_failure_is_tagged_with_ply() {
        let err = replay(None, &["e4", "e5", "Ke3"]).unwrap_err();
        assert_eq!(err.ply(), Some(3));
        assert!(matches!(
            err,
            ReplayError::Move {
                source: MoveError::IllegalMove { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_bad_start_position() {
        let err = replay(Some("not a fen"), &["e4"]).unwrap_err();
        assert!(matches!(err, ReplayError::Position(_)));
        assert_eq!(err.ply(), None);
    }

    #[test]
    fn test_check_status_recorded() {
        let replay = replay(None, &["f3", "e5", "g4", "Qh4"]).unwrap();
        let last = replay.plies.last().unwrap();
        assert!(last.is_check);
        assert!(last.is_checkmate);
        assert!(!replay.plies[2].is_check);
    }

    #[test]
    fn test_extreme_counters_do_not_overflow() {
        let replay = replay(Some("4k3/8/8/8/8/8/8/4K1N1 w - - 4294967295 1"), &["Nf3"]).unwrap();
        assert_eq!(replay.final_board().halfmove_clock(), u32::MAX);
    }

    #[test]
    fn test_empty_game() {
        let replay = replay::<&str>(None, &[]).unwrap();
        assert!(replay.plies.is_empty());
        assert_eq!(replay.final_board(), &Board::default());
    }
}
