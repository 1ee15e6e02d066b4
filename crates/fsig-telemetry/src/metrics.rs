//! Prometheus metrics for future-signals.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which is a programming error caught on first access.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, CounterVec, Encoder,
    Histogram, IntCounter, TextEncoder,
};

/// Feed fetch attempts.
/// Labels: outcome (ok/http_error/parse_error)
pub static FEED_FETCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fsig_feed_fetch_total",
        "Total feed fetch attempts by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Feed rows dropped before becoming candidates.
/// Labels: reason (missing_field/unknown_direction/not_approved/low_confidence)
pub static FEED_ROWS_SKIPPED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fsig_feed_rows_skipped_total",
        "Total feed rows skipped by reason",
        &["reason"]
    )
    .unwrap()
});

/// Signals accepted into a report.
pub static SIGNALS_ACCEPTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fsig_signals_accepted_total",
        "Total signals accepted into a report"
    )
    .unwrap()
});

/// Signals dropped because their adjusted time was already taken.
pub static SIGNALS_DUPLICATE_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fsig_signals_duplicate_total",
        "Total signals dropped as duplicate adjusted times"
    )
    .unwrap()
});

/// Fetch iterations consumed per generation.
pub static GENERATION_ITERATIONS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "fsig_generation_iterations",
        "Fetch iterations consumed per report generation",
        vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0]
    )
    .unwrap()
});

/// Report generations.
/// Labels: outcome (complete/partial/fault)
pub static GENERATION_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fsig_generation_total",
        "Total report generations by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// License verification attempts.
/// Labels: outcome (verified/rejected/unreachable/empty_key)
pub static LICENSE_VERIFY_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fsig_license_verify_total",
        "Total license verification attempts by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a feed fetch attempt.
    pub fn feed_fetch(outcome: &str) {
        FEED_FETCH_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record a skipped feed row.
    pub fn row_skipped(reason: &str) {
        FEED_ROWS_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn signal_accepted() {
        SIGNALS_ACCEPTED_TOTAL.inc();
    }

    pub fn signal_duplicate() {
        SIGNALS_DUPLICATE_TOTAL.inc();
    }

    /// Record a finished generation and the iterations it used.
    pub fn generation_finished(outcome: &str, iterations: u32) {
        GENERATION_TOTAL.with_label_values(&[outcome]).inc();
        GENERATION_ITERATIONS.observe(f64::from(iterations));
    }

    /// Record a generation that faulted before finishing its loop.
    pub fn generation_fault() {
        GENERATION_TOTAL.with_label_values(&["fault"]).inc();
    }

    pub fn license_verify(outcome: &str) {
        LICENSE_VERIFY_TOTAL.with_label_values(&[outcome]).inc();
    }
}

/// Register every metric with the default registry.
///
/// Statics register on first access, so a process that has recorded
/// nothing would otherwise expose nothing.
pub fn register_all() {
    Lazy::force(&FEED_FETCH_TOTAL);
    Lazy::force(&FEED_ROWS_SKIPPED_TOTAL);
    Lazy::force(&SIGNALS_ACCEPTED_TOTAL);
    Lazy::force(&SIGNALS_DUPLICATE_TOTAL);
    Lazy::force(&GENERATION_ITERATIONS);
    Lazy::force(&GENERATION_TOTAL);
    Lazy::force(&LICENSE_VERIFY_TOTAL);
}

/// Render all metrics in the Prometheus text format.
pub fn render_metrics() -> TelemetryResult<String> {
    register_all();

    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}
