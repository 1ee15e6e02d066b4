//! License gate configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Verification endpoint (POST, JSON body).
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_verify_url() -> String {
    "https://serverdztrader.pythonanywhere.com/verify".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            verify_url: default_verify_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LicenseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.verify_url.trim().is_empty() {
            return Err("license verify_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("license timeout_secs must be positive".to_string());
        }
        Ok(())
    }
}
