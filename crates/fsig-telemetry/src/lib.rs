//! Prometheus metrics and structured logging for future-signals.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for feed fetches, row filtering, dedup and
//!   license verification

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::{register_all, render_metrics, Metrics};
