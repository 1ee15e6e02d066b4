//! Application configuration.

use crate::error::{AppError, AppResult};
use fsig_aggregator::{AggregatorConfig, ReportTemplate};
use fsig_core::InstrumentFilter;
use fsig_feed::FeedConfig;
use fsig_license::LicenseConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FSIG_CONFIG";

/// Config file used when neither the flag nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Signal selection settings shared by the feed and the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsConfig {
    /// Minimum confidence percentage. Default: 98.0.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_min_confidence() -> f64 {
    98.0
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
        }
    }
}

/// Where device identity and the verification flag are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Optional override of the approved-instrument whitelist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentsConfig {
    /// Approved codes. `None` keeps the built-in deployment list.
    #[serde(default)]
    pub approved: Option<Vec<String>>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub signals: SignalsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub license: LicenseConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub report: ReportTemplate,
    #[serde(default)]
    pub instruments: InstrumentsConfig,
}

impl AppConfig {
    /// Resolve the config path: CLI arg > FSIG_CONFIG env var > default.
    pub fn resolve_path(cli_path: Option<String>) -> (String, bool) {
        match cli_path.or_else(|| std::env::var(CONFIG_ENV).ok()) {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH.to_string(), false),
        }
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist. A missing default file falls
    /// back to built-in defaults.
    pub fn load(cli_path: Option<String>) -> AppResult<Self> {
        let (config_path, explicit) = Self::resolve_path(cli_path);

        let config = if explicit || Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Validate every section.
    pub fn validate(&self) -> AppResult<()> {
        if !self.signals.min_confidence.is_finite() {
            return Err(AppError::Config(format!(
                "signals.min_confidence ({}) must be a finite percentage",
                self.signals.min_confidence
            )));
        }
        self.feed_config().validate().map_err(AppError::Config)?;
        self.aggregator_config().validate().map_err(AppError::Config)?;
        self.license.validate().map_err(AppError::Config)?;

        if self.persistence.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "persistence.data_dir must not be empty".to_string(),
            ));
        }
        if let Some(approved) = &self.instruments.approved {
            if approved.iter().all(|code| code.trim().is_empty()) {
                return Err(AppError::Config(
                    "instruments.approved must list at least one code".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Feed settings with the shared confidence threshold applied.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            min_confidence: self.signals.min_confidence,
            ..self.feed.clone()
        }
    }

    /// Aggregator settings with the shared confidence threshold applied.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            min_confidence: self.signals.min_confidence,
            ..self.aggregator.clone()
        }
    }

    /// Approved-instrument whitelist.
    pub fn instrument_filter(&self) -> InstrumentFilter {
        match &self.instruments.approved {
            Some(codes) => InstrumentFilter::new(codes),
            None => InstrumentFilter::default(),
        }
    }
}
