//! Stable per-installation device identifier.

use crate::error::{LicenseError, LicenseResult};
use fsig_persistence::PersistenceStore;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Store key of the device record.
pub const DEVICE_KEY: &str = "device";

/// Persisted device record: `{"device_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
}

impl DeviceIdentity {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self {
            device_id: Uuid::new_v4().to_string(),
        }
    }

    /// Read the persisted identity, if a usable one exists.
    pub fn load(store: &dyn PersistenceStore) -> Option<Self> {
        let value = store.get(DEVICE_KEY)?;
        serde_json::from_value::<Self>(value)
            .ok()
            .filter(|identity| !identity.device_id.trim().is_empty())
    }

    /// Reuse the persisted identity or create and persist a new one.
    pub fn load_or_create(store: &dyn PersistenceStore) -> LicenseResult<Self> {
        if let Some(identity) = Self::load(store) {
            return Ok(identity);
        }

        let identity = Self::generate();
        let value = serde_json::to_value(&identity)
            .map_err(|e| LicenseError::Identity(format!("Failed to encode device record: {e}")))?;
        store.set(DEVICE_KEY, value)?;

        info!(device_id = %identity.device_id, "Created device identity");
        Ok(identity)
    }
}
