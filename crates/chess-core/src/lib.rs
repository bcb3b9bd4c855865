//! Chess rules core: board model, attack geometry, SAN resolution and
//! ply-by-ply replay of recorded games, plus the PGN/clock/time-control
//! parsing that feeds it.

pub mod attacks;
pub mod board;
pub mod clock;
pub mod error;
pub mod game_data;
pub mod movegen;
pub mod pgn;
pub mod replay;
pub mod san;
pub mod square_set;
pub mod time_control;
pub mod types;

pub use board::{Board, CastleSide, CastlingRights, STARTING_FEN};
pub use error::{ClockParseError, MoveError, PositionError, ReplayError, TimeControlError};
pub use movegen::{Move, MoveKind};
pub use replay::{replay, Ply, Replay};
pub use square_set::SquareSet;
pub use types::{Color, Piece, Role, Square};
