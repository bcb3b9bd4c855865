//! Unified driver that runs every annotator over a game in a single pass.

use chess_core::clock::clock_samples;
use chess_core::game_data::GameInput;
use chess_core::{replay, Ply};
use serde::Serialize;
use tracing::debug;

use crate::analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
use crate::analyzers;
use crate::error::GameError;

/// A fully annotated game: every ply with its annotation at the same index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedGame {
    pub game_id: String,
    pub plies: Vec<Ply>,
    pub annotations: Vec<Annotation>,
}

impl AnnotatedGame {
    pub fn rows(&self) -> impl Iterator<Item = (&Ply, &Annotation)> {
        self.plies.iter().zip(&self.annotations)
    }
}

/// Create all annotator instances.
fn create_all_annotators() -> Vec<Box<dyn PlyAnnotator>> {
    vec![
        Box::new(analyzers::captured::CapturedAnnotator),
        Box::new(analyzers::fork::ForkAnnotator),
        Box::new(analyzers::checkmate::CheckmateAnnotator),
        Box::new(analyzers::phase::PhaseAnnotator),
        Box::new(analyzers::think_time::ThinkTimeAnnotator),
    ]
}

/// Replay and annotate one game. Any failure abandons the whole game.
pub fn annotate_game(game: &GameInput) -> Result<AnnotatedGame, GameError> {
    let replay = replay(game.start_position.as_deref(), &game.sans())?;
    let clocks = clock_samples(&game.moves, &game.time_control)?;
    let annotators = create_all_annotators();

    let last = replay.plies.len().saturating_sub(1);
    let mut annotations = Vec::with_capacity(replay.plies.len());

    for (i, ply) in replay.plies.iter().enumerate() {
        let ctx = PlyContext {
            ply,
            before: replay.board_before(i),
            is_final: i == last,
            checkmated: game.checkmated,
            clocks: &clocks,
            time_control: &game.time_control,
        };

        let mut annotation = Annotation::new(ply.index);
        for annotator in &annotators {
            if let Err(e) = annotator.annotate(&ctx, &mut annotation) {
                debug!(
                    game_id = %game.game_id,
                    annotator = annotator.name(),
                    ply = ply.index,
                    error = %e,
                    "annotator rejected ply"
                );
                return Err(e);
            }
        }
        annotations.push(annotation);
    }

    debug!(
        game_id = %game.game_id,
        plies = replay.plies.len(),
        "annotated game"
    );

    Ok(AnnotatedGame {
        game_id: game.game_id.clone(),
        plies: replay.plies,
        annotations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::phase::GamePhase;
    use chess_core::pgn::RecordedMove;
    use chess_core::time_control::{TimeClass, TimeControl};
    use chess_core::{Color, Role};

    fn game(moves: &[(&str, Option<&str>)], tc: TimeControl) -> GameInput {
        GameInput {
            game_id: "test".into(),
            start_position: None,
            moves: moves
                .iter()
                .map(|(san, clock)| RecordedMove::new(*san, *clock))
                .collect(),
            time_control: tc,
            checkmated: None,
        }
    }

    #[test]
    fn test_fools_mate_end_to_end() {
        let mut input = game(
            &[
                ("f3", Some("0:04:58")),
                ("e5", Some("0:04:59")),
                ("g4", Some("0:04:50")),
                ("Qh4#", Some("0:04:57")),
            ],
            TimeControl::new(300, 0, TimeClass::Blitz),
        );
        input.checkmated = Some(Color::White);

        let annotated = annotate_game(&input).unwrap();
        assert_eq!(annotated.plies.len(), 4);
        assert_eq!(annotated.annotations.len(), 4);

        let last = &annotated.annotations[3];
        assert_eq!(last.checkmate_attackers, vec![Role::Queen]);
        assert_eq!(last.phase, GamePhase::Opening);
        assert_eq!(last.clock.think_time, 2.0);
        assert_eq!(annotated.annotations[2].clock.think_time, 8.0);
        assert!(annotated.annotations[..3]
            .iter()
            .all(|a| a.checkmate_attackers.is_empty()));
    }

    #[test]
    fn test_illegal_move_fails_whole_game() {
        let input = game(
            &[("e4", None), ("e5", None), ("Ke3", None)],
            TimeControl::new(86400, 0, TimeClass::Daily),
        );
        let err = annotate_game(&input).unwrap_err();
        assert_eq!(err.kind(), "illegal_move");
        assert_eq!(err.ply(), Some(3));
    }

    #[test]
    fn test_missing_clock_in_timed_game() {
        let input = game(
            &[("e4", Some("0:02:59")), ("e5", None)],
            TimeControl::new(180, 0, TimeClass::Blitz),
        );
        let err = annotate_game(&input).unwrap_err();
        assert_eq!(err.kind(), "clock_parse");
        assert_eq!(err.ply(), Some(2));
    }

    #[test]
    fn test_empty_game() {
        let input = game(&[], TimeControl::new(600, 0, TimeClass::Rapid));
        let annotated = annotate_game(&input).unwrap();
        assert!(annotated.plies.is_empty());
        assert!(annotated.annotations.is_empty());
    }

    #[test]
    fn test_annotator_order() {
        let names: Vec<&str> = create_all_annotators().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["captured", "fork", "checkmate", "phase", "think_time"]);
    }
}
