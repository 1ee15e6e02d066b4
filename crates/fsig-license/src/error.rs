//! License error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("Please enter a key")]
    EmptyKey,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] fsig_persistence::PersistenceError),

    #[error("Device identity error: {0}")]
    Identity(String),
}

pub type LicenseResult<T> = Result<T, LicenseError>;
