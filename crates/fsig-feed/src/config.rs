//! Feed configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the feed adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed page URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum confidence percentage for a row to be kept.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// User-Agent header sent with each fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url() -> String {
    "https://www.gammaxbd.xyz".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_min_confidence() -> f64 {
    98.0
}

fn default_user_agent() -> String {
    format!("future-signals/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            min_confidence: default_min_confidence(),
            user_agent: default_user_agent(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("feed url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("feed timeout_secs must be positive".to_string());
        }
        if !self.min_confidence.is_finite() {
            return Err(format!(
                "min_confidence ({}) must be a finite percentage",
                self.min_confidence
            ));
        }
        Ok(())
    }
}
