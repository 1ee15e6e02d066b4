//! Time-of-day arithmetic for signal times.
//!
//! Feed rows carry a bare `HH:MM` time-of-day with no date attached. Shifting
//! between zones therefore wraps around midnight on a 24h clock instead of
//! rolling a calendar date.

use crate::error::{CoreError, Result};
use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format used for every signal time, in and out.
pub const TIME_FORMAT: &str = "%H:%M";

/// Minutes in one day.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// A signal time-of-day with minute precision.
///
/// Ordering is chronological within a single day (`00:00` first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignalTime(NaiveTime);

impl SignalTime {
    /// Build from hour and minute.
    ///
    /// Returns `None` when either component is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse a `HH:MM` string (surrounding whitespace ignored).
    pub fn parse(text: &str) -> Result<Self> {
        NaiveTime::parse_from_str(text.trim(), TIME_FORMAT)
            .map(Self)
            .map_err(|_| CoreError::InvalidTime(text.to_string()))
    }

    /// Shift by a signed offset, wrapping across midnight.
    #[must_use]
    pub fn shifted(self, shift: TimeShift) -> Self {
        let (time, _days) = self
            .0
            .overflowing_add_signed(Duration::minutes(shift.normalized_minutes()));
        Self(time)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl fmt::Display for SignalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for SignalTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SignalTime {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SignalTime> for String {
    fn from(value: SignalTime) -> Self {
        value.to_string()
    }
}

/// Signed offset applied to feed times to reach the reporting zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeShift {
    minutes: i64,
}

impl TimeShift {
    pub const fn minutes(minutes: i64) -> Self {
        Self { minutes }
    }

    pub const fn hours(hours: i64) -> Self {
        Self {
            minutes: hours * 60,
        }
    }

    /// Raw offset in minutes (may exceed a day).
    pub fn as_minutes(&self) -> i64 {
        self.minutes
    }

    /// Offset reduced into `(-1 day, 1 day)`; whole days do not move a time-of-day.
    fn normalized_minutes(&self) -> i64 {
        self.minutes % MINUTES_PER_DAY
    }
}

impl fmt::Display for TimeShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.unsigned_abs();
        write!(f, "{}{}h{:02}m", sign, abs / 60, abs % 60)
    }
}
