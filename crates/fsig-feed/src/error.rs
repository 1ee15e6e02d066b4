//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl FeedError {
    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::HttpClient(_) | Self::Request(_) | Self::Status(_) => "http_error",
            Self::Parse(_) => "parse_error",
        }
    }
}

pub type FeedResult<T> = Result<T, FeedError>;
