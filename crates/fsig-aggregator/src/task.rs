//! Background generation.
//!
//! Generation runs on its own tokio task so the caller stays responsive
//! while the feed is polled. The handle always resolves to a report.

use crate::aggregator::SignalAggregator;
use crate::error::GenerationFault;
use crate::report::SignalReport;
use chrono::NaiveDate;
use fsig_telemetry::Metrics;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

/// Handle to one in-flight generation.
#[derive(Debug)]
pub struct GenerationHandle {
    inner: JoinHandle<SignalReport>,
}

impl GenerationHandle {
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the report. A panicked task yields a fault report.
    pub async fn wait(self) -> SignalReport {
        match self.inner.await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Generation task did not complete");
                Metrics::generation_fault();
                SignalReport::fault(&GenerationFault::Task(e.to_string()))
            }
        }
    }
}

impl SignalAggregator {
    /// Start one generation on a background task.
    pub fn spawn_generation(self: &Arc<Self>) -> GenerationHandle {
        let aggregator = Arc::clone(self);
        GenerationHandle {
            inner: tokio::spawn(async move { aggregator.generate().await }),
        }
    }

    /// Start one generation dated `date` on a background task.
    pub fn spawn_generation_on(self: &Arc<Self>, date: NaiveDate) -> GenerationHandle {
        let aggregator = Arc::clone(self);
        GenerationHandle {
            inner: tokio::spawn(async move { aggregator.generate_on(date).await }),
        }
    }
}
