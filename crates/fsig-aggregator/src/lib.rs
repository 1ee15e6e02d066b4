//! Signal aggregation and report rendering.
//!
//! Drives a `SignalSource` until enough distinct signals are collected or
//! the iteration budget runs out, then sorts them and renders the report.
//! The outer `generate()` never fails: faults become an error report.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod report;
pub mod task;

pub use aggregator::{Collection, SignalAggregator};
pub use config::AggregatorConfig;
pub use error::{GenerationFault, GenerationResult};
pub use report::{ReportBody, ReportTemplate, SignalReport, DATE_FORMAT};
pub use task::GenerationHandle;
