//! Seconds spent on each move, from the clock samples.
//!
//! A player's previous clock is the sample two plies back (their own last
//! move), or the base allotment before their first move.

use chess_core::clock::ClockSample;
use chess_core::time_control::TimeControl;
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{Annotation, PlyAnnotator, PlyContext};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockUsage {
    pub prev_clock: f64,
    pub clock_after_move_less_increment: f64,
    pub clock_after_move: f64,
    pub think_time: f64,
}

/// Clock usage for 1-based `ply`. Daily games, and plies without a sample,
/// report zeros.
pub fn clock_usage(samples: &[ClockSample], time_control: &TimeControl, ply: usize) -> ClockUsage {
    if time_control.is_daily() {
        return ClockUsage::default();
    }
    let Some(current) = ply.checked_sub(1).and_then(|i| samples.get(i)) else {
        return ClockUsage::default();
    };

    let prev_clock = ply
        .checked_sub(3)
        .and_then(|i| samples.get(i))
        .map(|s| s.remaining)
        .unwrap_or(f64::from(time_control.base));
    let clock_after_move = current.remaining;
    let clock_after_move_less_increment = clock_after_move - f64::from(time_control.increment);

    ClockUsage {
        prev_clock,
        clock_after_move_less_increment,
        clock_after_move,
        think_time: prev_clock - clock_after_move_less_increment,
    }
}

pub struct ThinkTimeAnnotator;

impl PlyAnnotator for ThinkTimeAnnotator {
    fn name(&self) -> &'static str {
        "think_time"
    }

    fn annotate(&self, ctx: &PlyContext, annotation: &mut Annotation) -> Result<(), GameError> {
        annotation.clock = clock_usage(ctx.clocks, ctx.time_control, ctx.ply.index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::time_control::TimeClass;

    fn samples(remaining: &[f64]) -> Vec<ClockSample> {
        remaining
            .iter()
            .enumerate()
            .map(|(i, &remaining)| ClockSample { ply: i + 1, remaining })
            .collect()
    }

    #[test]
    fn test_same_color_two_plies_back() {
        let tc = TimeControl::new(300, 0, TimeClass::Blitz);
        let clocks = samples(&[295.0, 298.0, 280.0]);

        let first = clock_usage(&clocks, &tc, 1);
        assert_eq!(first.prev_clock, 300.0);
        assert_eq!(first.think_time, 5.0);

        let third = clock_usage(&clocks, &tc, 3);
        assert_eq!(third.prev_clock, 295.0);
        assert_eq!(third.clock_after_move, 280.0);
        assert_eq!(third.think_time, 15.0);
    }

    #[test]
    fn test_increment_is_subtracted() {
        let tc = TimeControl::new(180, 2, TimeClass::Blitz);
        let clocks = samples(&[181.0, 180.5]);

        let usage = clock_usage(&clocks, &tc, 1);
        assert_eq!(usage.clock_after_move_less_increment, 179.0);
        assert_eq!(usage.think_time, 1.0);

        let usage = clock_usage(&clocks, &tc, 2);
        assert_eq!(usage.think_time, 1.5);
    }

    #[test]
    fn test_daily_is_zero() {
        let tc = TimeControl::new(86400, 0, TimeClass::Daily);
        let clocks = samples(&[86000.0, 80000.0, 50000.0]);
        for ply in 1..=3 {
            assert_eq!(clock_usage(&clocks, &tc, ply), ClockUsage::default());
        }
    }
}
