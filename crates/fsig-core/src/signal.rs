//! Signal records flowing from the feed to the report.

use crate::error::{CoreError, Result};
use crate::time::{SignalTime, TimeShift};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Call,
    Put,
}

impl Action {
    /// Parse feed direction text.
    ///
    /// Case-insensitive exact match after trimming; anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_uppercase().as_str() {
            "CALL" => Some(Self::Call),
            "PUT" => Some(Self::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| CoreError::InvalidAction(s.to_string()))
    }
}

/// A feed row that passed the whitelist and confidence filters.
///
/// `time` is the trimmed feed text in the feed's time zone. It is parsed
/// only when the signal is adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    /// Normalized instrument code (e.g., "USDTRY-OTC").
    pub pair: String,
    /// Feed time-of-day, `HH:MM`.
    pub time: String,
    pub action: Action,
    /// Confidence percentage (e.g., 99.5).
    pub confidence: f64,
}

impl CandidateSignal {
    pub fn new(
        pair: impl Into<String>,
        time: impl Into<String>,
        action: Action,
        confidence: f64,
    ) -> Self {
        Self {
            pair: pair.into(),
            time: time.into(),
            action,
            confidence,
        }
    }

    /// Shift the feed time into the reporting zone.
    ///
    /// Fails if the feed time is not `HH:MM`.
    pub fn adjust(&self, shift: TimeShift) -> Result<AdjustedSignal> {
        let time = SignalTime::parse(&self.time)?.shifted(shift);
        Ok(AdjustedSignal {
            pair: self.pair.clone(),
            time,
            action: self.action,
            confidence: self.confidence,
        })
    }
}

/// A candidate whose time is expressed in the reporting zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedSignal {
    pub pair: String,
    pub time: SignalTime,
    pub action: Action,
    pub confidence: f64,
}

impl AdjustedSignal {
    /// Report line: `"  M1;{pair};{HH:MM};{action}"`.
    pub fn line(&self) -> String {
        format!("  M1;{};{};{}", self.pair, self.time, self.action)
    }
}
