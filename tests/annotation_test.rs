//! End-to-end annotation of whole games: checkmate attackers, forks, game
//! phase boundaries and think time.

mod common;

use chess_analyzers::analyzers::phase::{classify, major_minor_count};
use chess_analyzers::{annotate_game, GamePhase};
use chess_core::game_data::GameInput;
use chess_core::pgn::parse_movetext;
use chess_core::time_control::{TimeClass, TimeControl};
use chess_core::{Board, Color, Piece, Role};
use common::*;

#[test]
fn test_fools_mate_attackers() {
    let game = with_checkmated(daily_game(FOOLS_MATE), Color::White);
    let annotated = annotate_game(&game).unwrap();
    let last = annotated.annotations.last().unwrap();
    assert_eq!(last.checkmate_attackers, vec![Role::Queen]);
    assert_eq!(
        serde_json::to_value(&last.checkmate_attackers).unwrap(),
        serde_json::json!(["queen"])
    );
}

#[test]
fn test_opera_game_attackers_and_fork() {
    let game = with_checkmated(daily_game(OPERA_GAME), Color::Black);
    let annotated = annotate_game(&game).unwrap();

    let last = annotated.annotations.last().unwrap();
    assert_eq!(last.checkmate_attackers, vec![Role::Bishop, Role::Rook]);

    // 15. Bxd7+ hits the queen on e6 and the king on e8.
    assert_eq!(annotated.plies[28].san, "Bxd7+");
    assert_eq!(
        annotated.annotations[28].forked_pieces,
        vec![
            Piece::new(Color::Black, Role::Queen),
            Piece::new(Color::Black, Role::King)
        ]
    );

    // 17. Rd8# hits the knight on b8 and the king.
    assert_eq!(
        last.forked_pieces,
        vec![
            Piece::new(Color::Black, Role::Knight),
            Piece::new(Color::Black, Role::King)
        ]
    );
}

#[test]
fn test_checkmate_requires_metadata() {
    let annotated = annotate_game(&daily_game(FOOLS_MATE)).unwrap();
    assert!(annotated
        .annotations
        .iter()
        .all(|a| a.checkmate_attackers.is_empty()));
}

#[test]
fn test_knight_fork_on_two_pieces() {
    let game = GameInput {
        start_position: Some("r3k3/8/8/3N4/8/8/8/4K3 w - - 0 1".into()),
        ..daily_game("1. Nc7+ *")
    };
    let annotated = annotate_game(&game).unwrap();
    assert_eq!(
        annotated.annotations[0].forked_pieces,
        vec![
            Piece::new(Color::Black, Role::Rook),
            Piece::new(Color::Black, Role::King)
        ]
    );
}

#[test]
fn test_single_target_is_no_fork() {
    let game = GameInput {
        start_position: Some("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1".into()),
        ..daily_game("1. Nc7+ *")
    };
    let annotated = annotate_game(&game).unwrap();
    assert!(annotated.annotations[0].forked_pieces.is_empty());
}

#[test]
fn test_phase_boundaries() {
    let six = Board::from_fen("rnb1k3/pppp4/8/8/8/8/PPPP4/R1B1K1N1 w - - 0 30").unwrap();
    assert_eq!(major_minor_count(&six), 6);
    assert_eq!(classify(&six), GamePhase::Endgame);

    let ten = Board::from_fen("rnbqk1n1/pppppppp/8/8/8/8/PPPPPPPP/RNBQK1N1 w - - 0 20").unwrap();
    assert_eq!(major_minor_count(&ten), 10);
    assert_eq!(classify(&ten), GamePhase::Midgame);

    let fourteen = Board::default();
    assert_eq!(major_minor_count(&fourteen), 14);
    assert_eq!(classify(&fourteen), GamePhase::Opening);
}

#[test]
fn test_phase_over_a_game() {
    let annotated = annotate_game(&daily_game(OPERA_GAME)).unwrap();
    assert_eq!(annotated.annotations[0].phase, GamePhase::Opening);
    // By the final mate only rook, bishop, queen, knight, bishop and rook remain.
    let last = annotated.annotations.last().unwrap();
    assert_eq!(last.major_minor_count, 6);
    assert_eq!(last.phase, GamePhase::Endgame);
}

#[test]
fn test_think_time() {
    let game = timed_game(&["e4", "e5", "Nf3"], &[295.0, 298.0, 280.0], 300, 0);
    let annotated = annotate_game(&game).unwrap();
    let third = &annotated.annotations[2].clock;
    assert_eq!(third.prev_clock, 295.0);
    assert_eq!(third.clock_after_move, 280.0);
    assert_eq!(third.think_time, 15.0);
    assert_eq!(annotated.annotations[0].clock.think_time, 5.0);
}

#[test]
fn test_think_time_with_increment() {
    let game = timed_game(&["d4", "d5", "c4"], &[181.0, 179.0, 175.0], 180, 2);
    let annotated = annotate_game(&game).unwrap();
    let third = &annotated.annotations[2].clock;
    assert_eq!(third.clock_after_move_less_increment, 173.0);
    assert_eq!(third.think_time, 181.0 - 173.0);
}

#[test]
fn test_daily_clocks_are_zero() {
    let game = GameInput {
        moves: parse_movetext("1. e4 {[%clk 71:59:58]} 1... e5 {[%clk garbage]} 2. Nf3"),
        time_control: TimeControl::parse("1/259200", None).unwrap(),
        ..daily_game("")
    };
    assert_eq!(game.time_control.class, TimeClass::Daily);
    let annotated = annotate_game(&game).unwrap();
    for annotation in &annotated.annotations {
        assert_eq!(annotation.clock.prev_clock, 0.0);
        assert_eq!(annotation.clock.clock_after_move, 0.0);
        assert_eq!(annotation.clock.think_time, 0.0);
    }
}

#[test]
fn test_failed_game_reports_ply() {
    let err = annotate_game(&daily_game("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Bxc6 Nf6 5. Bxe8")).unwrap_err();
    assert_eq!(err.ply(), Some(9));
    assert_eq!(err.kind(), "illegal_move");

    let err = annotate_game(&daily_game("1. e4 e5 2. Zz9")).unwrap_err();
    assert_eq!(err.kind(), "unknown_notation");
    assert_eq!(err.ply(), Some(3));

    // Both rooks reach d1.
    let mut game = daily_game("1. Rd1");
    game.start_position = Some("4k3/8/8/8/8/8/4K3/R6R w - - 0 1".into());
    let err = annotate_game(&game).unwrap_err();
    assert_eq!(err.kind(), "ambiguous_move");
    assert_eq!(err.ply(), Some(1));

    let mut game = daily_game("1. e4");
    game.start_position = Some("8/8/8/8/8/8/8/8 w - - 0 1".into());
    let err = annotate_game(&game).unwrap_err();
    assert_eq!(err.kind(), "malformed_position");
    assert_eq!(err.ply(), None);
}
