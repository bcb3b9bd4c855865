#![allow(dead_code)]

use chess_core::game_data::GameInput;
use chess_core::pgn::{parse_movetext, RecordedMove};
use chess_core::time_control::{TimeClass, TimeControl};
use chess_core::Color;

/// Morphy vs. the Duke of Brunswick and Count Isouard, Paris 1858.
pub const OPERA_GAME: &str = "1. e4 e5 2. Nf3 d6 3. d4 Bg4 4. dxe5 Bxf3 5. Qxf3 dxe5 \
6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 \
12. O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8# 1-0";

/// En passant, both castles and a disambiguated knight move.
pub const EN_PASSANT_GAME: &str =
    "1. d4 e5 2. dxe5 d5 3. exd6 Bxd6 4. Nf3 Nc6 5. e3 Nge7 6. Be2 O-O 7. O-O Bg4 *";

pub const FOOLS_MATE: &str = "1. f3 e5 2. g4 Qh4# 0-1";

/// Promotions for both sides from a set-up position.
pub const PROMOTION_START: &str = "r3k3/1P6/8/8/8/8/1p6/4K2R w K - 0 1";
pub const PROMOTION_GAME: &str = "1. bxa8=Q+ Kd7 2. O-O b1=N 3. Rd1+ Ke6 *";

pub fn sans(movetext: &str) -> Vec<String> {
    parse_movetext(movetext).into_iter().map(|m| m.san).collect()
}

/// An untimed game with no result metadata.
pub fn daily_game(movetext: &str) -> GameInput {
    GameInput {
        game_id: "daily".into(),
        start_position: None,
        moves: parse_movetext(movetext),
        time_control: TimeControl::new(86400, 0, TimeClass::Daily),
        checkmated: None,
    }
}

/// A timed game whose moves carry the given clock readings in seconds.
pub fn timed_game(sans: &[&str], clocks: &[f64], base: u32, increment: u32) -> GameInput {
    let moves = sans
        .iter()
        .zip(clocks)
        .map(|(san, secs)| RecordedMove::new(*san, Some(&format_clock(*secs))))
        .collect();
    GameInput {
        game_id: "timed".into(),
        start_position: None,
        moves,
        time_control: TimeControl::new(base, increment, TimeClass::estimate(base, increment)),
        checkmated: None,
    }
}

pub fn with_checkmated(mut game: GameInput, color: Color) -> GameInput {
    game.checkmated = Some(color);
    game
}

fn format_clock(secs: f64) -> String {
    let whole = secs.floor() as u64;
    let tenths = ((secs - secs.floor()) * 10.0).round() as u64;
    format!("{}:{:02}:{:02}.{}", whole / 3600, (whole / 60) % 60, whole % 60, tenths)
}
