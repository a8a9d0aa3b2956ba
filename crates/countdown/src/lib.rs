//! # Countdown - Wall-clock countdown for the overhead display
//!
//! Computes the time left until a countdown expires and formats it the way
//! the on-screen panel shows it.
//!
//! ## Example
//!
//! ```rust
//! use countdown::{Countdown, Utc};
//!
//! let now = Utc::now();
//! let countdown = Countdown::start(5, now).unwrap();
//! assert_eq!(countdown.label(now), "05:00");
//! ```

use std::time::Duration as StdDuration;

use chrono::Duration;
use thiserror::Error;

// Re-exports for convenience
pub use chrono::{DateTime, Utc};

/// Countdowns must be shorter than a full day
pub const MAX_MINUTES: u32 = 1440;

/// Shortest delay between two redraws
pub const MIN_TICK: StdDuration = StdDuration::from_millis(10);

/// Result type for countdown operations
pub type Result<T> = std::result::Result<T, CountdownError>;

#[derive(Error, Debug, PartialEq)]
pub enum CountdownError {
    #[error("countdown time is out of range ([0; {max}) minutes expected, got {minutes})", max = MAX_MINUTES)]
    OutOfRange { minutes: i64 },

    #[error("countdown time did not parse as an integer: {0}")]
    Parse(String),
}

/// A running countdown with a fixed expiry instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    minutes: u32,
    expiry: DateTime<Utc>,
}

impl Countdown {
    /// Start a countdown of `minutes` minutes at `now`. Zero minutes is a disabled countdown.
    pub fn start(minutes: u32, now: DateTime<Utc>) -> Result<Self> {
        if minutes >= MAX_MINUTES {
            return Err(CountdownError::OutOfRange {
                minutes: minutes as i64,
            });
        }
        Ok(Self {
            minutes,
            expiry: now + Duration::minutes(minutes as i64),
        })
    }

    pub fn start_now(minutes: u32) -> Result<Self> {
        Self::start(minutes, Utc::now())
    }

    pub fn is_enabled(&self) -> bool {
        self.minutes > 0
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Time left at `now`, clamped to zero once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        Remaining::from_millis((self.expiry - now).num_milliseconds())
    }

    /// Hours are only shown for countdowns of an hour or more
    pub fn shows_hours(&self) -> bool {
        self.minutes >= 60
    }

    /// Panel text at `now`
    pub fn label(&self, now: DateTime<Utc>) -> String {
        self.remaining(now).format(self.shows_hours())
    }
}

/// Broken-down time left on a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
    /// False once the expiry has passed
    pub running: bool,
}

impl Remaining {
    pub fn from_millis(delta_ms: i64) -> Self {
        let running = delta_ms >= 0;
        let total = delta_ms.max(0) as u64;
        Self {
            hours: (total / 3_600_000) as u32,
            minutes: (total / 60_000 % 60) as u32,
            seconds: (total / 1000 % 60) as u32,
            millis: (total % 1000) as u32,
            running,
        }
    }

    /// `H:MM:SS` (hours padded to two columns) or `MM:SS`
    pub fn format(&self, with_hours: bool) -> String {
        if with_hours {
            format!("{:2}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            format!("{:02}:{:02}", self.minutes, self.seconds)
        }
    }

    /// Delay until just after the displayed second changes
    pub fn next_tick(&self) -> StdDuration {
        StdDuration::from_millis(self.millis as u64 + 1).max(MIN_TICK)
    }
}

/// Parse a `--countdown` value: whole minutes in `[0, 1440)`
pub fn parse_minutes(value: &str) -> Result<u32> {
    let minutes: i64 = value
        .trim()
        .parse()
        .map_err(|_| CountdownError::Parse(value.to_string()))?;
    if !(0..MAX_MINUTES as i64).contains(&minutes) {
        return Err(CountdownError::OutOfRange { minutes });
    }
    Ok(minutes as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_short_countdown_label() {
        let countdown = Countdown::start(5, noon()).unwrap();
        assert_eq!(countdown.label(noon()), "05:00");
        assert_eq!(countdown.label(noon() + Duration::milliseconds(1500)), "04:58");
        assert_eq!(countdown.label(noon() + Duration::minutes(5)), "00:00");
    }

    #[test]
    fn test_long_countdown_shows_hours() {
        let countdown = Countdown::start(90, noon()).unwrap();
        assert_eq!(countdown.label(noon()), " 1:30:00");
        assert_eq!(countdown.label(noon() + Duration::seconds(61)), " 1:28:59");
    }

    #[test]
    fn test_remaining_clamps_after_expiry() {
        let countdown = Countdown::start(1, noon()).unwrap();
        let remaining = countdown.remaining(noon() + Duration::minutes(3));
        assert!(!remaining.running);
        assert_eq!(remaining, Remaining::from_millis(-1));
        assert_eq!(remaining.format(false), "00:00");
        assert!(countdown.remaining(noon()).running);
    }

    #[test]
    fn test_remaining_breakdown() {
        let remaining = Remaining::from_millis(3_723_456);
        assert_eq!(
            remaining,
            Remaining { hours: 1, minutes: 2, seconds: 3, millis: 456, running: true }
        );
    }

    #[test]
    fn test_next_tick_after_second_flip() {
        assert_eq!(Remaining::from_millis(2_250).next_tick(), StdDuration::from_millis(251));
        assert_eq!(Remaining::from_millis(2_000).next_tick(), MIN_TICK);
    }

    #[test]
    fn test_out_of_range_minutes() {
        assert_eq!(
            Countdown::start(MAX_MINUTES, noon()),
            Err(CountdownError::OutOfRange { minutes: 1440 })
        );
        assert!(!Countdown::start(0, noon()).unwrap().is_enabled());
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("25"), Ok(25));
        assert_eq!(parse_minutes("0"), Ok(0));
        assert_eq!(parse_minutes("-1"), Err(CountdownError::OutOfRange { minutes: -1 }));
        assert_eq!(parse_minutes("1440"), Err(CountdownError::OutOfRange { minutes: 1440 }));
        assert!(matches!(parse_minutes("5m"), Err(CountdownError::Parse(_))));
    }
}
