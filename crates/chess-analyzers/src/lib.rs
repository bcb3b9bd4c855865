//! Per-ply chess annotations.
//!
//! Each annotator reads one replayed ply (and the position it was played
//! from) and fills in its part of an [`Annotation`]: the captured piece,
//! forked pieces, checkmate attackers, game phase and clock usage. The main
//! entry point is [`annotate_game`], which replays and annotates one game.

pub mod analyzer_trait;
pub mod analyzers;
pub mod error;
pub mod unified;

use chess_core::game_data::GameInput;

pub use analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
pub use analyzers::phase::GamePhase;
pub use analyzers::think_time::ClockUsage;
pub use error::GameError;
pub use unified::{annotate_game, AnnotatedGame};

/// Annotate a batch of games sequentially, one result per game in input
/// order. A failure in one game does not affect the others.
pub fn annotate_batch(games: &[GameInput]) -> Vec<Result<AnnotatedGame, GameError>> {
    games.iter().map(annotate_game).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::pgn::parse_movetext;
    use chess_core::time_control::{TimeClass, TimeControl};

    fn daily(id: &str, movetext: &str) -> GameInput {
        GameInput {
            game_id: id.into(),
            start_position: None,
            moves: parse_movetext(movetext),
            time_control: TimeControl::new(86400, 0, TimeClass::Daily),
            checkmated: None,
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let games = vec![
            daily("bad", "1. e4 e5 2. Ke3"),
            daily("good", "1. d4 d5 2. c4"),
        ];
        let results = annotate_batch(&games);
        assert_eq!(results.len(), 2);

        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.kind(), "illegal_move");
        assert_eq!(err.ply(), Some(3));

        let game = results[1].as_ref().unwrap();
        assert_eq!(game.game_id, "good");
        assert_eq!(game.annotations.len(), 3);
    }
}
