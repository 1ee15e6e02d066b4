//! Main application orchestration.
//!
//! Coordinates all components:
//! - Persistence store (device identity, verification flag)
//! - License gate
//! - HTTP feed source and aggregator
//!
//! Generation is only reachable with a `VerifiedSession`.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use fsig_aggregator::{GenerationHandle, SignalAggregator, SignalReport};
use fsig_feed::{DynSignalSource, HttpSignalSource};
use fsig_license::{
    DynLicenseAuthority, HttpLicenseAuthority, LicenseGate, VerifiedSession, VerifyOutcome,
};
use fsig_persistence::{DynStore, JsonFileStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Progress log interval while a generation runs in the background.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Main application.
pub struct Application {
    config: AppConfig,
    gate: LicenseGate,
    aggregator: Arc<SignalAggregator>,
}

impl Application {
    /// Create the application with HTTP-backed components.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store: DynStore = Arc::new(JsonFileStore::new(config.persistence.data_dir.clone()));
        let authority: DynLicenseAuthority = Arc::new(HttpLicenseAuthority::new(&config.license)?);
        let source: DynSignalSource = Arc::new(HttpSignalSource::new(
            config.feed_config(),
            Arc::new(config.instrument_filter()),
        )?);

        Ok(Self::with_components(config, store, authority, source))
    }

    /// Create the application from prebuilt components.
    pub fn with_components(
        config: AppConfig,
        store: DynStore,
        authority: DynLicenseAuthority,
        source: DynSignalSource,
    ) -> Self {
        let gate = LicenseGate::new(store, authority);
        let aggregator = Arc::new(
            SignalAggregator::new(source, config.aggregator_config())
                .with_template(config.report.clone()),
        );

        Self {
            config,
            gate,
            aggregator,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_verified(&self) -> bool {
        self.gate.is_verified()
    }

    pub fn session(&self) -> Option<VerifiedSession> {
        self.gate.session()
    }

    /// Submit a license key.
    pub async fn verify(&self, key: &str) -> AppResult<VerifyOutcome> {
        Ok(self.gate.verify(key).await?)
    }

    /// Start one generation on a background task.
    pub fn start_generation(&self, _session: &VerifiedSession) -> GenerationHandle {
        self.aggregator.spawn_generation()
    }

    /// Run one generation, logging progress until the report is ready.
    pub async fn generate_with_progress(
        &self,
        session: &VerifiedSession,
        interval: Duration,
    ) -> SignalReport {
        let started = Instant::now();
        let wait = self.start_generation(session).wait();
        tokio::pin!(wait);

        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately.
        ticker.tick().await;

        let report = loop {
            tokio::select! {
                report = &mut wait => break report,
                _ = ticker.tick() => {
                    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Generating signals...");
                }
            }
        };

        info!(
            signals = report.signals().len(),
            fault = report.is_fault(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generation finished"
        );
        report
    }

    /// Generate a report, refusing while the installation is unverified.
    pub async fn generate(&self) -> AppResult<SignalReport> {
        let session = self.session().ok_or(AppError::NotVerified)?;
        Ok(self.generate_with_progress(&session, PROGRESS_INTERVAL).await)
    }
}
