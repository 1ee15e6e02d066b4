//! Aggregation loop.
//!
//! Each pass fetches one batch, re-checks the confidence threshold, shifts
//! times into the report zone and keeps the first signal seen for each
//! adjusted time. A whole batch is consumed per pass, so the final count
//! can exceed `target_count`. The loop stops only on the size bound or the
//! iteration budget; a pass that adds nothing still counts toward the
//! budget and the loop fetches again.

use crate::config::AggregatorConfig;
use crate::error::{GenerationFault, GenerationResult};
use crate::report::{ReportTemplate, SignalReport};
use chrono::{Local, NaiveDate};
use fsig_core::{AdjustedSignal, SignalTime};
use fsig_feed::DynSignalSource;
use fsig_telemetry::Metrics;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Signals gathered by one run of the loop, plus loop statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Accepted signals sorted by adjusted time.
    pub signals: Vec<AdjustedSignal>,
    /// Fetch cycles consumed.
    pub iterations: u32,
    /// Passes that accepted nothing.
    pub no_progress_passes: u32,
    /// Longest run of consecutive passes that accepted nothing.
    pub longest_no_progress_streak: u32,
    /// Candidates dropped because their adjusted time was taken.
    pub duplicates_dropped: u32,
}

/// Orchestrates fetching, adjustment, de-duplication and rendering.
pub struct SignalAggregator {
    source: DynSignalSource,
    config: AggregatorConfig,
    template: ReportTemplate,
}

impl SignalAggregator {
    pub fn new(source: DynSignalSource, config: AggregatorConfig) -> Self {
        Self {
            source,
            config,
            template: ReportTemplate::default(),
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: ReportTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Run the fetch loop until the size bound or the iteration budget.
    pub async fn collect(&self) -> GenerationResult<Collection> {
        self.config.validate().map_err(GenerationFault::Config)?;

        let shift = self.config.time_shift();
        let mut signals: Vec<AdjustedSignal> = Vec::with_capacity(self.config.target_count);
        let mut taken: HashSet<SignalTime> = HashSet::new();
        let mut iterations = 0u32;
        let mut no_progress_passes = 0u32;
        let mut streak = 0u32;
        let mut longest_streak = 0u32;
        let mut duplicates_dropped = 0u32;

        while signals.len() < self.config.target_count && iterations < self.config.max_iterations
        {
            let batch = self.source.fetch().await;
            let mut accepted = 0usize;

            for candidate in batch {
                if !(candidate.confidence >= self.config.min_confidence) {
                    continue;
                }

                let adjusted = candidate.adjust(shift)?;
                if taken.insert(adjusted.time) {
                    debug!(
                        pair = %adjusted.pair,
                        time = %adjusted.time,
                        action = %adjusted.action,
                        "Signal accepted"
                    );
                    Metrics::signal_accepted();
                    signals.push(adjusted);
                    accepted += 1;
                } else {
                    Metrics::signal_duplicate();
                    duplicates_dropped += 1;
                }
            }

            iterations += 1;

            if accepted == 0 {
                no_progress_passes += 1;
                streak += 1;
                longest_streak = longest_streak.max(streak);
                debug!(iteration = iterations, streak, "No new signals this pass, fetching again");
                continue;
            }

            streak = 0;
            debug!(
                iteration = iterations,
                accepted,
                total = signals.len(),
                "Pass complete"
            );
        }

        // Stable sort; adjusted times are unique so there are no ties.
        signals.sort_by_key(|signal| signal.time);

        let complete = signals.len() >= self.config.target_count;
        if complete {
            info!(signals = signals.len(), iterations, "Signal target reached");
        } else {
            warn!(
                signals = signals.len(),
                target = self.config.target_count,
                iterations,
                "Iteration budget exhausted before target"
            );
        }
        Metrics::generation_finished(if complete { "complete" } else { "partial" }, iterations);

        Ok(Collection {
            signals,
            iterations,
            no_progress_passes,
            longest_no_progress_streak: longest_streak,
            duplicates_dropped,
        })
    }

    /// Collect and render a report dated `date`.
    pub async fn try_generate_on(&self, date: NaiveDate) -> GenerationResult<SignalReport> {
        let collection = self.collect().await?;
        Ok(SignalReport::render(date, collection.signals, &self.template))
    }

    /// Collect and render a report dated today (local time).
    pub async fn try_generate(&self) -> GenerationResult<SignalReport> {
        self.try_generate_on(Local::now().date_naive()).await
    }

    /// Generate a report, turning any fault into an error report.
    pub async fn generate(&self) -> SignalReport {
        Self::flatten(self.try_generate().await)
    }

    /// Same as `generate()` with a fixed report date.
    pub async fn generate_on(&self, date: NaiveDate) -> SignalReport {
        Self::flatten(self.try_generate_on(date).await)
    }

    fn flatten(result: GenerationResult<SignalReport>) -> SignalReport {
        match result {
            Ok(report) => report,
            Err(fault) => {
                warn!(error = %fault, "Report generation failed");
                Metrics::generation_fault();
                SignalReport::fault(&fault)
            }
        }
    }
}
