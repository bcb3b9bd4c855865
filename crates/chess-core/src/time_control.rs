//! Time control parsing: `"600"`, `"180+2"`, and daily `"1/86400"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimeControlError;

/// Moves assumed per game when estimating a class from base + increment.
const ESTIMATED_MOVES: u32 = 40;
const BULLET_BELOW: u32 = 180;
const BLITZ_BELOW: u32 = 600;
const RAPID_BELOW: u32 = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeClass {
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Daily,
}

impl TimeClass {
    pub fn name(self) -> &'static str {
        match self {
            TimeClass::Bullet => "bullet",
            TimeClass::Blitz => "blitz",
            TimeClass::Rapid => "rapid",
            TimeClass::Classical => "classical",
            TimeClass::Daily => "daily",
        }
    }

    /// Class implied by a clock of `base` seconds plus `increment` per move.
    pub fn estimate(base: u32, increment: u32) -> TimeClass {
        let total = base.saturating_add(increment.saturating_mul(ESTIMATED_MOVES));
        if total < BULLET_BELOW {
            TimeClass::Bullet
        } else if total < BLITZ_BELOW {
            TimeClass::Blitz
        } else if total < RAPID_BELOW {
            TimeClass::Rapid
        } else {
            TimeClass::Classical
        }
    }
}

impl fmt::Display for TimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeClass {
    type Err = TimeControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullet" => Ok(TimeClass::Bullet),
            "blitz" => Ok(TimeClass::Blitz),
            "rapid" => Ok(TimeClass::Rapid),
            "classical" | "standard" => Ok(TimeClass::Classical),
            "daily" | "correspondence" => Ok(TimeClass::Daily),
            _ => Err(TimeControlError::Class(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Starting clock in seconds; for daily games, seconds allowed per move.
    pub base: u32,
    pub increment: u32,
    pub class: TimeClass,
}

impl TimeControl {
    pub fn new(base: u32, increment: u32, class: TimeClass) -> Self {
        Self {
            base,
            increment,
            class,
        }
    }

    /// Parse a time-control string. `class` overrides the estimate when the
    /// record carries one.
    pub fn parse(text: &str, class: Option<TimeClass>) -> Result<TimeControl, TimeControlError> {
        let err = || TimeControlError::Format(text.to_string());
        let text = text.trim();
        let number = |s: &str| s.parse::<u32>().map_err(|_| err());

        if text == "-" {
            return Ok(TimeControl::new(0, 0, TimeClass::Daily));
        }
        if let Some((_, per_move)) = text.split_once('/') {
            let base = number(per_move)?;
            return Ok(TimeControl::new(base, 0, class.unwrap_or(TimeClass::Daily)));
        }
        let (base, increment) = match text.split_once('+') {
            Some((base, inc)) => (number(base)?, number(inc)?),
            None => (number(text)?, 0),
        };
        let class = class.unwrap_or_else(|| TimeClass::estimate(base, increment));
        Ok(TimeControl::new(base, increment, class))
    }

    pub fn is_daily(&self) -> bool {
        self.class == TimeClass::Daily
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(
            TimeControl::parse("180+2", None).unwrap(),
            TimeControl::new(180, 2, TimeClass::Blitz)
        );
        assert_eq!(
            TimeControl::parse("600", None).unwrap(),
            TimeControl::new(600, 0, TimeClass::Rapid)
        );
        assert_eq!(
            TimeControl::parse("1/86400", None).unwrap(),
            TimeControl::new(86400, 0, TimeClass::Daily)
        );
        assert_eq!(
            TimeControl::parse("60", None).unwrap().class,
            TimeClass::Bullet
        );
    }

    #[test]
    fn test_explicit_class_wins() {
        let tc = TimeControl::parse("600", Some(TimeClass::Blitz)).unwrap();
        assert_eq!(tc.class, TimeClass::Blitz);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(TimeControl::parse("ten minutes", None).is_err());
        assert!(TimeControl::parse("180+", None).is_err());
        assert!("hyper".parse::<TimeClass>().is_err());
    }
}
