//! Aggregator configuration.

use fsig_core::TimeShift;
use serde::{Deserialize, Serialize};

/// Configuration for the aggregation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Stop fetching once this many distinct signals are collected.
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Maximum fetch cycles per report.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Offset from feed time to report time, in minutes.
    /// Default: -540 (feed is UTC+6, report is UTC-3).
    #[serde(default = "default_time_shift_minutes")]
    pub time_shift_minutes: i64,
    /// Confidence threshold re-applied to every fetched candidate.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_target_count() -> usize {
    8
}

fn default_max_iterations() -> u32 {
    200
}

fn default_time_shift_minutes() -> i64 {
    -9 * 60
}

fn default_min_confidence() -> f64 {
    98.0
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            max_iterations: default_max_iterations(),
            time_shift_minutes: default_time_shift_minutes(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl AggregatorConfig {
    pub fn time_shift(&self) -> TimeShift {
        TimeShift::minutes(self.time_shift_minutes)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.target_count == 0 {
            return Err("target_count must be positive".to_string());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".to_string());
        }
        if !self.min_confidence.is_finite() {
            return Err(format!(
                "min_confidence ({}) must be a finite percentage",
                self.min_confidence
            ));
        }
        Ok(())
    }
}
