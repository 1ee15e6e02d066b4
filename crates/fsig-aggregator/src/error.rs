//! Generation fault types.

use fsig_core::CoreError;
use thiserror::Error;

/// Unexpected failure while building a report.
#[derive(Debug, Error)]
pub enum GenerationFault {
    #[error("{0}")]
    InvalidSignal(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Generation task failed: {0}")]
    Task(String),
}

pub type GenerationResult<T> = Result<T, GenerationFault>;
