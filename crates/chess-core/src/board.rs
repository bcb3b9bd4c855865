//! Board model: piece placement plus side to move, castling rights,
//! en passant target and move counters, with FEN parsing and serialization.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PositionError;
use crate::square_set::SquareSet;
use crate::types::{Color, Piece, Role, Square};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const MAX_PIECES_PER_SIDE: usize = 16;
const MAX_PAWNS_PER_SIDE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const fn rook_from_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    pub const fn king_to_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    pub const fn rook_to_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside,
            (Color::White, CastleSide::Queenside) => self.white_queenside,
            (Color::Black, CastleSide::Kingside) => self.black_kingside,
            (Color::Black, CastleSide::Queenside) => self.black_queenside,
        }
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside = false,
            (Color::White, CastleSide::Queenside) => self.white_queenside = false,
            (Color::Black, CastleSide::Kingside) => self.black_kingside = false,
            (Color::Black, CastleSide::Queenside) => self.black_queenside = false,
        }
    }

    pub fn revoke_color(&mut self, color: Color) {
        self.revoke(color, CastleSide::Kingside);
        self.revoke(color, CastleSide::Queenside);
    }

    fn to_fen(self) -> String {
        let mut s = String::with_capacity(4);
        if self.white_kingside {
            s.push('K');
        }
        if self.white_queenside {
            s.push('Q');
        }
        if self.black_kingside {
            s.push('k');
        }
        if self.black_queenside {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }

    /// Only the canonical `KQkq` ordering is accepted so that serialization
    /// reproduces the input exactly.
    fn from_fen(field: &str) -> Result<Self, PositionError> {
        let err = || PositionError::Castling(field.to_string());
        if field == "-" {
            return Ok(CastlingRights::default());
        }
        if field.is_empty() {
            return Err(err());
        }
        let mut rights = CastlingRights::default();
        let mut last = 0;
        for c in field.chars() {
            let order = match c {
                'K' => 1,
                'Q' => 2,
                'k' => 3,
                'q' => 4,
                _ => return Err(err()),
            };
            if order <= last {
                return Err(err());
            }
            last = order;
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                _ => rights.black_queenside = true,
            }
        }
        Ok(rights)
    }
}

/// A full position snapshot. Replay produces a fresh `Board` per ply and never
/// mutates one that has already been handed out.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Default for Board {
    fn default() -> Self {
        let mut squares = [None; 64];
        let back = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];
        for (file, role) in back.into_iter().enumerate() {
            squares[file] = Some(Piece::new(Color::White, role));
            squares[8 + file] = Some(Piece::new(Color::White, Role::Pawn));
            squares[48 + file] = Some(Piece::new(Color::Black, Role::Pawn));
            squares[56 + file] = Some(Piece::new(Color::Black, role));
        }
        Board {
            squares,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl Board {
    /// Parse a 6-field FEN string.
    pub fn from_fen(fen: &str) -> Result<Board, PositionError> {
        let fields: Vec<&str> = fen.split(' ').collect();
        if fields.len() != 6 {
            return Err(PositionError::FieldCount(fields.len()));
        }

        let squares = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(PositionError::SideToMove(other.to_string())),
        };

        let castling = CastlingRights::from_fen(fields[2])?;

        let en_passant = match fields[3] {
            "-" => None,
            field => {
                let sq: Square = field
                    .parse()
                    .map_err(|_| PositionError::EnPassant(field.to_string()))?;
                // The target sits behind a pawn the opponent just pushed.
                let expected_rank = match side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if sq.rank() != expected_rank {
                    return Err(PositionError::EnPassant(field.to_string()));
                }
                Some(sq)
            }
        };

        let halfmove_clock = parse_counter(fields[4])?;
        let fullmove_number = parse_counter(fields[5])?;
        if fullmove_number == 0 {
            return Err(PositionError::Counter(fields[5].to_string()));
        }

        Ok(Board {
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn to_fen(&self) -> String {
        let ep = self
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board_fen(),
            match self.side_to_move {
                Color::White => 'w',
                Color::Black => 'b',
            },
            self.castling.to_fen(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Placement field of the FEN only.
    pub fn board_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[rank * 8 + file] {
                    Some(piece) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// All occupied squares with their pieces, ascending.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn occupied(&self) -> SquareSet {
        self.pieces().map(|(sq, _)| sq).collect()
    }

    pub fn occupied_by(&self, color: Color) -> SquareSet {
        self.pieces()
            .filter(|(_, p)| p.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn pieces_of(&self, color: Color, role: Role) -> SquareSet {
        let target = Piece::new(color, role);
        self.pieces()
            .filter(|(_, p)| *p == target)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color, Role::King).iter().next()
    }

    pub(crate) fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index() as usize] = piece;
    }
}

fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], PositionError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(PositionError::Placement(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    let mut squares = [None; 64];
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        let mut prev_digit = false;
        for c in rank_str.chars() {
            if let Some(d) = c.to_digit(10) {
                // "44" or "0" would not survive a round trip.
                if d == 0 || d > 8 || prev_digit {
                    return Err(PositionError::Placement(format!(
                        "bad empty-square run in rank {}",
                        rank + 1
                    )));
                }
                file += d as usize;
                prev_digit = true;
            } else {
                let piece = Piece::from_symbol(c).ok_or_else(|| {
                    PositionError::Placement(format!("unknown piece {c:?} in rank {}", rank + 1))
                })?;
                if file >= 8 {
                    return Err(PositionError::Placement(format!(
                        "rank {} is longer than 8 squares",
                        rank + 1
                    )));
                }
                squares[rank * 8 + file] = Some(piece);
                file += 1;
                prev_digit = false;
            }
        }
        if file != 8 {
            return Err(PositionError::Placement(format!(
                "rank {} has {} squares",
                rank + 1,
                file
            )));
        }
    }

    validate_piece_counts(&squares)?;
    Ok(squares)
}

fn validate_piece_counts(squares: &[Option<Piece>; 64]) -> Result<(), PositionError> {
    for color in Color::ALL {
        let mine = || squares.iter().flatten().filter(move |p| p.color == color);
        let kings = mine().filter(|p| p.role == Role::King).count();
        if kings != 1 {
            return Err(PositionError::PieceCount(format!(
                "{color} has {kings} kings"
            )));
        }
        let total = mine().count();
        if total > MAX_PIECES_PER_SIDE {
            return Err(PositionError::PieceCount(format!(
                "{color} has {total} pieces"
            )));
        }
        let pawns = mine().filter(|p| p.role == Role::Pawn).count();
        if pawns > MAX_PAWNS_PER_SIDE {
            return Err(PositionError::PieceCount(format!(
                "{color} has {pawns} pawns"
            )));
        }
    }
    let back_rank_pawn = (0..8)
        .chain(56..64)
        .any(|i| matches!(squares[i], Some(p) if p.role == Role::Pawn));
    if back_rank_pawn {
        return Err(PositionError::PieceCount(
            "pawn on the first or last rank".to_string(),
        ));
    }
    Ok(())
}

fn parse_counter(field: &str) -> Result<u32, PositionError> {
    let err = || PositionError::Counter(field.to_string());
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    if field.len() > 1 && field.starts_with('0') {
        return Err(err());
    }
    field.parse().map_err(|_| err())
}

impl FromStr for Board {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fen())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Board::from_fen(&s).map_err(de::Error::custom)
    }
}
