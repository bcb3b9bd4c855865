//! Move generation and application.
//!
//! Only what replay needs: pseudo-legal moves for the side to move, the
//! own-king safety filter, and producing the successor board.

use crate::attacks::{attacked_squares, is_attacked, pawn_attacks};
use crate::board::{Board, CastleSide};
use crate::square_set::SquareSet;
use crate::types::{Color, Piece, Role, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoublePawnPush,
    EnPassant,
    Castle(CastleSide),
}

/// A fully resolved move. For castling `from`/`to` are the king's squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Role>,
    pub kind: MoveKind,
}

impl Move {
    /// Square the captured piece stood on; differs from `to` for en passant.
    pub fn capture_square(&self) -> Square {
        match self.kind {
            MoveKind::EnPassant => {
                Square::from_coords(self.to.file() as i8, self.from.rank() as i8)
                    .unwrap_or(self.to)
            }
            _ => self.to,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl Board {
    /// Pseudo-legal moves for the side to move: obey piece movement rules
    /// but may leave the mover's king in check.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let us = self.side_to_move;
        let own = self.occupied_by(us);
        let mut moves = Vec::with_capacity(64);

        for (from, piece) in self.pieces().filter(|(_, p)| p.color == us) {
            match piece.role {
                Role::Pawn => self.push_pawn_moves(from, piece, &mut moves),
                _ => {
                    let targets = attacked_squares(self, from) & !own;
                    for to in targets {
                        moves.push(Move {
                            from,
                            to,
                            piece,
                            captured: self.piece_at(to),
                            promotion: None,
                            kind: MoveKind::Normal,
                        });
                    }
                }
            }
        }

        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if let Some(mv) = self.castle_move(side) {
                moves.push(mv);
            }
        }
        moves
    }

    fn push_pawn_moves(&self, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let color = piece.color;
        let dir = color.pawn_direction();
        let start_rank = match color {
            Color::White => 1,
            Color::Black => 6,
        };
        let last_rank = 7 - color.back_rank();

        let mut push = |to: Square, captured: Option<Piece>, kind: MoveKind| {
            if to.rank() == last_rank {
                for role in Role::PROMOTIONS {
                    moves.push(Move {
                        from,
                        to,
                        piece,
                        captured,
                        promotion: Some(role),
                        kind,
                    });
                }
            } else {
                moves.push(Move {
                    from,
                    to,
                    piece,
                    captured,
                    promotion: None,
                    kind,
                });
            }
        };

        if let Some(one) = from.offset(0, dir) {
            if self.piece_at(one).is_none() {
                push(one, None, MoveKind::Normal);
                if from.rank() == start_rank {
                    if let Some(two) = from.offset(0, 2 * dir) {
                        if self.piece_at(two).is_none() {
                            push(two, None, MoveKind::DoublePawnPush);
                        }
                    }
                }
            }
        }

        for to in pawn_attacks(color, from) {
            match self.piece_at(to) {
                Some(target) if target.color != color => {
                    push(to, Some(target), MoveKind::Normal)
                }
                None if self.en_passant == Some(to) => {
                    let behind = Square::from_coords(to.file() as i8, from.rank() as i8);
                    let victim = behind.and_then(|sq| self.piece_at(sq));
                    if matches!(victim, Some(p) if p == Piece::new(!color, Role::Pawn)) {
                        push(to, victim, MoveKind::EnPassant);
                    }
                }
                _ => {}
            }
        }
    }

    /// Castling is generated fully checked: rights held, king and rook on
    /// their home squares, the path empty, and the king neither in check nor
    /// crossing an attacked square.
    fn castle_move(&self, side: CastleSide) -> Option<Move> {
        let us = self.side_to_move;
        if !self.castling.has(us, side) {
            return None;
        }
        let rank = us.back_rank() as i8;
        let king_from = Square::from_coords(4, rank)?;
        let rook_from = Square::from_coords(side.rook_from_file() as i8, rank)?;
        let king_to = Square::from_coords(side.king_to_file() as i8, rank)?;
        let king = Piece::new(us, Role::King);

        if self.piece_at(king_from) != Some(king)
            || self.piece_at(rook_from) != Some(Piece::new(us, Role::Rook))
        {
            return None;
        }

        let (lo, hi) = if rook_from.file() < king_from.file() {
            (rook_from.file() + 1, king_from.file())
        } else {
            (king_from.file() + 1, rook_from.file())
        };
        let path_clear = (lo..hi).all(|file| {
            Square::from_coords(file as i8, rank)
                .map(|sq| self.piece_at(sq).is_none())
                .unwrap_or(false)
        });
        if !path_clear {
            return None;
        }

        let step: i8 = if king_to.file() > king_from.file() { 1 } else { -1 };
        let crossed = [king_from, king_from.offset(step, 0)?, king_to];
        if crossed.iter().any(|&sq| is_attacked(self, !us, sq)) {
            return None;
        }

        Some(Move {
            from: king_from,
            to: king_to,
            piece: king,
            captured: None,
            promotion: None,
            kind: MoveKind::Castle(side),
        })
    }

    /// Pseudo-legal moves that do not leave the mover's own king attacked.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|mv| self.is_legal(mv))
            .collect()
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        let us = self.side_to_move;
        let after = self.play(mv);
        match after.king_square(us) {
            Some(king) => !is_attacked(&after, !us, king),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        !self.checkers().is_empty()
    }

    /// Squares of opponent pieces giving check to the side to move.
    pub fn checkers(&self) -> SquareSet {
        let us = self.side_to_move;
        match self.king_square(us) {
            Some(king) => crate::attacks::attackers(self, !us, king),
            None => SquareSet::EMPTY,
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// Successor position after `mv`. Does not check legality; `self` is
    /// left untouched.
    pub fn play(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        let us = mv.piece.color;

        next.set_piece(mv.from, None);
        if mv.kind == MoveKind::EnPassant {
            next.set_piece(mv.capture_square(), None);
        }
        let arriving = match mv.promotion {
            Some(role) => Piece::new(us, role),
            None => mv.piece,
        };
        next.set_piece(mv.to, Some(arriving));

        if let MoveKind::Castle(side) = mv.kind {
            let rank = us.back_rank() as i8;
            if let (Some(rook_from), Some(rook_to)) = (
                Square::from_coords(side.rook_from_file() as i8, rank),
                Square::from_coords(side.rook_to_file() as i8, rank),
            ) {
                next.set_piece(rook_from, None);
                next.set_piece(rook_to, Some(Piece::new(us, Role::Rook)));
            }
        }

        if mv.piece.role == Role::King {
            next.castling.revoke_color(us);
        }
        // A rook leaving or being captured on its home corner loses the right.
        for sq in [mv.from, mv.to] {
            for color in Color::ALL {
                for side in [CastleSide::Kingside, CastleSide::Queenside] {
                    let corner =
                        Square::from_coords(side.rook_from_file() as i8, color.back_rank() as i8);
                    if corner == Some(sq) {
                        next.castling.revoke(color, side);
                    }
                }
            }
        }

        next.en_passant = match mv.kind {
            MoveKind::DoublePawnPush => mv.from.offset(0, us.pawn_direction()),
            _ => None,
        };

        if mv.piece.role == Role::Pawn || mv.captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            next.fullmove_number = next.fullmove_number.saturating_add(1);
        }
        next.side_to_move = !us;
        next
    }
}
