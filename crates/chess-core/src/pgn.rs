//! PGN parsing utilities: a lightweight regex-based parser.
//!
//! Splits movetext into SAN tokens and keeps the `[%clk ...]` comment that
//! follows each move. Clock tokens are kept raw here; whether a malformed
//! clock matters depends on the game's time class (see [`crate::clock`]).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One move as written in the movetext, with its trailing clock comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMove {
    pub san: String,
    /// Raw contents of `[%clk ...]`, e.g. `0:02:59.9`.
    pub clock: Option<String>,
}

impl RecordedMove {
    pub fn new(san: impl Into<String>, clock: Option<&str>) -> Self {
        Self {
            san: san.into(),
            clock: clock.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnGame {
    pub result: String,
    pub time_control: Option<String>,
    /// Starting FEN when the game was set up from a custom position.
    pub start_fen: Option<String>,
    pub moves: Vec<RecordedMove>,
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("header pattern is valid"))
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{[^}]*\}|[()]|\$\d+|\d+\.+|[^\s{}()]+").expect("token pattern is valid")
    })
}

fn clock_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[%clk\s+([^\]]*)\]").expect("clock pattern is valid"))
}

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Parse a PGN string into headers of interest and its movetext.
pub fn parse_pgn(pgn: &str) -> PgnGame {
    let mut result = "*".to_string();
    let mut time_control = None;
    let mut setup = None;
    let mut fen = None;

    for cap in header_regex().captures_iter(pgn) {
        let value = cap[2].to_string();
        match &cap[1] {
            "Result" => result = value,
            "TimeControl" => time_control = Some(value),
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // A FEN header without SetUp "1" is ignored, as PGN readers do.
    let start_fen = match setup.as_deref() {
        Some("1") => fen.filter(|f| !f.is_empty()),
        _ => None,
    };

    PgnGame {
        result,
        time_control,
        start_fen,
        moves: parse_movetext(pgn),
    }
}

/// Extract SAN moves and their clock comments, in order.
///
/// Headers, variations (nested ones included), NAGs, move numbers
/// (`12.` / `12...`) and the result token are dropped. A clock comment
/// attaches to the main-line move it follows.
pub fn parse_movetext(pgn: &str) -> Vec<RecordedMove> {
    let movetext = header_regex().replace_all(pgn, "");
    let mut moves: Vec<RecordedMove> = Vec::new();
    let mut depth = 0usize;

    for token in token_regex().find_iter(&movetext) {
        let token = token.as_str();
        match token {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            _ if token.starts_with('{') => {
                if let (Some(last), Some(cap)) = (moves.last_mut(), clock_regex().captures(token)) {
                    if last.clock.is_none() {
                        last.clock = Some(cap[1].trim().to_string());
                    }
                }
            }
            _ if token.starts_with('$')
                || is_move_number(token)
                || RESULT_TOKENS.contains(&token) => {}
            _ => moves.push(RecordedMove::new(token, None)),
        }
    }

    moves
}

fn is_move_number(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHESS_COM_PGN: &str = r#"[Event "Live Chess"]
[Site "Chess.com"]
[White "alice"]
[Black "bob"]
[Result "0-1"]
[TimeControl "300"]
[Termination "bob won by checkmate"]

1. f3 {[%clk 0:04:58.1]} 1... e5 {[%clk 0:04:59.2]} 2. g4 {[%clk 0:04:55.3]} 2... Qh4# {[%clk 0:04:57]} 0-1"#;

    #[test]
    fn test_parse_pgn_basic() {
        let game = parse_pgn(CHESS_COM_PGN);
        assert_eq!(game.result, "0-1");
        assert_eq!(game.time_control.as_deref(), Some("300"));
        assert_eq!(game.start_fen, None);
        let sans: Vec<&str> = game.moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(game.moves[0].clock.as_deref(), Some("0:04:58.1"));
        assert_eq!(game.moves[3].clock.as_deref(), Some("0:04:57"));
    }

    #[test]
    fn test_movetext_without_clocks() {
        let moves = parse_movetext("1.e4 e5 2.Nf3 (2.Bc4 Nf6) Nc6 $1 3.Bb5 a6 1/2-1/2");
        let sans: Vec<&str> = moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
        assert!(moves.iter().all(|m| m.clock.is_none()));
    }

    #[test]
    fn test_nested_variations_are_skipped() {
        let moves = parse_movetext("1. e4 (1. d4 d5 (1... Nf6 2. c4) 2. c4) 1... e5 *");
        let sans: Vec<&str> = moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5"]);

        let moves = parse_movetext("1. e4 {[%clk 0:04:59]} (1. d4 {[%clk 0:01:00]}) 1... c5 *");
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].clock.as_deref(), Some("0:04:59"));
        assert_eq!(moves[1].clock, None);
    }

    #[test]
    fn test_castling_tokens_survive() {
        let moves = parse_movetext("10. O-O 0-0-0 11. Kh1 *");
        let sans: Vec<&str> = moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["O-O", "0-0-0", "Kh1"]);
    }

    #[test]
    fn test_malformed_clock_is_kept_raw() {
        let moves = parse_movetext("1. e4 {[%clk soon]} 1... e5");
        assert_eq!(moves[0].clock.as_deref(), Some("soon"));
        assert_eq!(moves[1].clock, None);
    }

    #[test]
    fn test_setup_header() {
        let pgn = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/8/4K2R w K - 0 1"]

1. O-O *"#;
        let game = parse_pgn(pgn);
        assert_eq!(
            game.start_fen.as_deref(),
            Some("4k3/8/8/8/8/8/8/4K2R w K - 0 1")
        );
        assert_eq!(game.moves.len(), 1);
    }
}
