//! Standard algebraic notation: parsing and resolution against a board.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::board::{Board, CastleSide};
use crate::error::MoveError;
use crate::movegen::{Move, MoveKind};
use crate::types::{Role, Square};

/// Check or checkmate marker written after a move. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    Check,
    Checkmate,
}

/// A resolved move, the position it leads to, and that position's
/// engine-computed check status.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub mv: Move,
    pub board: Board,
    pub status: Option<Suffix>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanKind {
    Normal {
        role: Role,
        file: Option<u8>,
        rank: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<Role>,
    },
    Castle(CastleSide),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct San {
    pub kind: SanKind,
    pub suffix: Option<Suffix>,
}

fn san_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(O-O-O|0-0-0)|(O-O|0-0)|([KQRBN])?([a-h])?([1-8])?(x)?([a-h][1-8])(?:=?([QRBN]))?)([+#])?[!?]*$",
        )
        .expect("SAN pattern is valid")
    })
}

impl FromStr for San {
    type Err = MoveError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let unknown = || MoveError::UnknownNotation(text.to_string());
        let caps = san_regex().captures(text.trim()).ok_or_else(unknown)?;

        let suffix = caps.get(9).map(|m| match m.as_str() {
            "#" => Suffix::Checkmate,
            _ => Suffix::Check,
        });

        let kind = if caps.get(1).is_some() {
            SanKind::Castle(CastleSide::Queenside)
        } else if caps.get(2).is_some() {
            SanKind::Castle(CastleSide::Kingside)
        } else {
            let role = match caps.get(3) {
                Some(m) => m.as_str().chars().next().and_then(Role::from_char),
                None => Some(Role::Pawn),
            }
            .ok_or_else(unknown)?;
            let file = caps.get(4).map(|m| m.as_str().as_bytes()[0] - b'a');
            let rank = caps.get(5).map(|m| m.as_str().as_bytes()[0] - b'1');
            let to: Square = caps
                .get(7)
                .ok_or_else(unknown)?
                .as_str()
                .parse()
                .map_err(|_| unknown())?;
            let promotion = caps
                .get(8)
                .and_then(|m| m.as_str().chars().next())
                .and_then(Role::from_char);

            if promotion.is_some() && role != Role::Pawn {
                return Err(unknown());
            }
            SanKind::Normal {
                role,
                file,
                rank,
                capture: caps.get(6).is_some(),
                to,
                promotion,
            }
        };

        Ok(San { kind, suffix })
    }
}

impl San {
    fn matches(&self, mv: &Move) -> bool {
        match self.kind {
            SanKind::Castle(side) => mv.kind == MoveKind::Castle(side),
            SanKind::Normal {
                role,
                to,
                promotion,
                ..
            } => {
                !matches!(mv.kind, MoveKind::Castle(_))
                    && mv.piece.role == role
                    && mv.to == to
                    && mv.promotion == promotion
            }
        }
    }

    fn matches_hints(&self, mv: &Move) -> bool {
        match self.kind {
            SanKind::Castle(_) => true,
            SanKind::Normal { file, rank, .. } => {
                file.map_or(true, |f| mv.from.file() == f)
                    && rank.map_or(true, |r| mv.from.rank() == r)
            }
        }
    }
}

impl Board {
    /// Resolve a parsed SAN to the unique legal move it denotes.
    pub fn resolve_san(&self, san: &San, text: &str) -> Result<Move, MoveError> {
        let candidates: Vec<Move> = self
            .pseudo_legal_moves()
            .into_iter()
            .filter(|mv| san.matches(mv))
            .filter(|mv| self.is_legal(mv))
            .filter(|mv| san.matches_hints(mv))
            .collect();

        match candidates.as_slice() {
            [mv] => {
                if let SanKind::Normal { capture, .. } = san.kind {
                    if capture != mv.is_capture() {
                        debug!(san = text, "capture marker disagrees with the position");
                    }
                }
                Ok(*mv)
            }
            [] => Err(MoveError::IllegalMove {
                san: text.to_string(),
                fen: self.to_fen(),
            }),
            many => Err(MoveError::AmbiguousMove {
                san: text.to_string(),
                fen: self.to_fen(),
                candidates: many.len(),
            }),
        }
    }

    /// Parse `text`, resolve it, and return the move with the successor board.
    pub fn apply_san(&self, text: &str) -> Result<AppliedMove, MoveError> {
        let san: San = text.parse()?;
        let mv = self.resolve_san(&san, text)?;
        let next = self.play(&mv);

        let computed = if !next.is_check() {
            None
        } else if next.legal_moves().is_empty() {
            Some(Suffix::Checkmate)
        } else {
            Some(Suffix::Check)
        };
        if computed != san.suffix {
            debug!(
                san = text,
                written = ?san.suffix,
                computed = ?computed,
                "check suffix disagrees with the position"
            );
        }
        Ok(AppliedMove {
            mv,
            board: next,
            status: computed,
        })
    }
}

/// Apply one SAN move to `board`, producing the successor position.
pub fn apply(board: &Board, move_text: &str) -> Result<Board, MoveError> {
    board.apply_san(move_text).map(|applied| applied.board)
}
