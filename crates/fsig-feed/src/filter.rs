//! Row normalization and filtering.

use crate::parser::RawFeedRow;
use fsig_core::{normalize_pair, Action, CandidateSignal, InstrumentFilter};
use fsig_telemetry::Metrics;
use std::sync::Arc;
use tracing::debug;

/// Why a row did not become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A required field was structurally absent.
    MissingField,
    /// Direction was neither CALL nor PUT.
    UnknownDirection,
    /// Instrument not in the approved set.
    NotApproved,
    /// Confidence below threshold (unparseable counts as 0).
    LowConfidence,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::UnknownDirection => "unknown_direction",
            Self::NotApproved => "not_approved",
            Self::LowConfidence => "low_confidence",
        }
    }
}

/// Parse a confidence cell such as `"99.5%"`. Unparseable text is `0.0`.
pub fn parse_confidence(text: &str) -> f64 {
    text.replace('%', "").trim().parse::<f64>().unwrap_or(0.0)
}

/// Turns raw rows into candidates using the whitelist and threshold.
#[derive(Debug, Clone)]
pub struct RowFilter {
    instruments: Arc<InstrumentFilter>,
    min_confidence: f64,
}

impl RowFilter {
    pub fn new(instruments: Arc<InstrumentFilter>, min_confidence: f64) -> Self {
        Self {
            instruments,
            min_confidence,
        }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Evaluate a single row.
    pub fn evaluate(&self, row: &RawFeedRow) -> Result<CandidateSignal, SkipReason> {
        let (Some(instrument), Some(direction), Some(time), Some(confidence)) = (
            row.instrument.as_deref(),
            row.direction.as_deref(),
            row.time.as_deref(),
            row.confidence.as_deref(),
        ) else {
            return Err(SkipReason::MissingField);
        };

        let pair = normalize_pair(instrument);
        let action = Action::parse(direction).ok_or(SkipReason::UnknownDirection)?;
        let confidence = parse_confidence(confidence);

        if !self.instruments.is_approved(&pair) {
            return Err(SkipReason::NotApproved);
        }
        // NaN compares false and is dropped here too.
        if !(confidence >= self.min_confidence) {
            return Err(SkipReason::LowConfidence);
        }

        Ok(CandidateSignal::new(pair, time.trim(), action, confidence))
    }

    /// Filter rows into candidates, keeping document order.
    pub fn candidates(&self, rows: &[RawFeedRow]) -> Vec<CandidateSignal> {
        rows.iter()
            .filter_map(|row| match self.evaluate(row) {
                Ok(candidate) => Some(candidate),
                Err(reason) => {
                    debug!(reason = reason.as_str(), ?row, "Feed row skipped");
                    Metrics::row_skipped(reason.as_str());
                    None
                }
            })
            .collect()
    }
}
