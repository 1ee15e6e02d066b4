//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("License not verified: run `future-signals verify` first")]
    NotVerified,

    #[error("License error: {0}")]
    License(#[from] fsig_license::LicenseError),

    #[error("Feed error: {0}")]
    Feed(#[from] fsig_feed::FeedError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] fsig_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
