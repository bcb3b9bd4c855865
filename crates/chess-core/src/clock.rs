//! Clock samples: seconds remaining after each ply.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ClockParseError;
use crate::pgn::RecordedMove;
use crate::time_control::TimeControl;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSample {
    /// 1-based ply index.
    pub ply: usize,
    /// Seconds on the mover's clock after the move.
    pub remaining: f64,
}

fn clock_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2}(?:\.\d+)?)$").expect("clock pattern is valid")
    })
}

/// Parse `H:MM:SS(.f)` or `M:SS(.f)` into seconds.
pub fn parse_clock(token: &str) -> Option<f64> {
    let caps = clock_regex().captures(token.trim())?;
    let hours: f64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// One sample per move. Daily games read as zero whatever their tokens say;
/// timed games need a well-formed clock on every move.
pub fn clock_samples(
    moves: &[RecordedMove],
    time_control: &TimeControl,
) -> Result<Vec<ClockSample>, ClockParseError> {
    moves
        .iter()
        .enumerate()
        .map(|(i, mv)| {
            let ply = i + 1;
            if time_control.is_daily() {
                return Ok(ClockSample { ply, remaining: 0.0 });
            }
            let token = mv.clock.as_deref().ok_or(ClockParseError::Missing { ply })?;
            let remaining = parse_clock(token).ok_or_else(|| ClockParseError::Malformed {
                ply,
                token: token.to_string(),
            })?;
            Ok(ClockSample { ply, remaining })
        })
        .collect()
}
