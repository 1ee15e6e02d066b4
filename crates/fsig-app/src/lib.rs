//! future-signals application.
//!
//! Wires the components together:
//! - License gate (checked before any generation)
//! - HTTP feed source with the instrument whitelist
//! - Aggregator running generation on a background task

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
