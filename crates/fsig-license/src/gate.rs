//! License gate.
//!
//! `is_verified()` never fails: a missing or unreadable flag means "not
//! verified". Once verification succeeds the flag stays set for the
//! installation; there is no way to un-verify.

use crate::authority::{AuthorityReply, DynLicenseAuthority, VerifyRequest};
use crate::error::{LicenseError, LicenseResult};
use crate::identity::DeviceIdentity;
use fsig_persistence::DynStore;
use fsig_telemetry::Metrics;
use serde_json::json;
use std::fmt;
use tracing::{info, warn};

/// Store key of the verification flag.
pub const VERIFIED_KEY: &str = "verified";

/// Message shown when the server rejects without explanation.
const NO_REASON: &str = "No reason given";

/// Result of one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Server accepted the key; the installation is now verified.
    Verified { message: Option<String> },
    /// Server explicitly rejected the key. Message passed through verbatim.
    Rejected(String),
    /// Server could not be reached or answered with an error status.
    Unreachable(String),
}

impl VerifyOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Human-readable message for this outcome.
    pub fn message(&self) -> &str {
        match self {
            Self::Verified { message } => message.as_deref().unwrap_or("Key verified"),
            Self::Rejected(message) | Self::Unreachable(message) => message,
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            Self::Verified { .. } => "verified",
            Self::Rejected(_) => "rejected",
            Self::Unreachable(_) => "unreachable",
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified { .. } => write!(f, "Key verified! You can now use the app."),
            Self::Rejected(message) | Self::Unreachable(message) => {
                write!(f, "Key rejected: {message}")
            }
        }
    }
}

/// Proof that the installation is verified.
///
/// Only the gate can create one, so anything that takes a
/// `&VerifiedSession` is unreachable while verification is pending.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    _private: (),
}

/// Gate in front of report generation.
pub struct LicenseGate {
    store: DynStore,
    authority: DynLicenseAuthority,
}

impl LicenseGate {
    pub fn new(store: DynStore, authority: DynLicenseAuthority) -> Self {
        Self { store, authority }
    }

    /// Read the persisted verification flag.
    pub fn is_verified(&self) -> bool {
        self.store
            .get(VERIFIED_KEY)
            .and_then(|record| record.get("verified").and_then(|v| v.as_bool()))
            .unwrap_or(false)
    }

    /// Session token if the installation is verified.
    pub fn session(&self) -> Option<VerifiedSession> {
        self.is_verified().then_some(VerifiedSession { _private: () })
    }

    /// Verify a key against the remote authority.
    ///
    /// Empty or whitespace-only keys fail with `EmptyKey` before any
    /// network call. Transport and server rejections are returned as
    /// outcomes so the caller can retry.
    pub async fn verify(&self, key: &str) -> LicenseResult<VerifyOutcome> {
        let key = key.trim();
        if key.is_empty() {
            Metrics::license_verify("empty_key");
            return Err(LicenseError::EmptyKey);
        }

        let identity = DeviceIdentity::load_or_create(self.store.as_ref())?;
        let request = VerifyRequest {
            device_id: identity.device_id.clone(),
            key: key.to_string(),
        };

        let outcome = match self.authority.submit(request).await {
            AuthorityReply::Unreachable(message) => VerifyOutcome::Unreachable(message),
            AuthorityReply::Answered(reply) if reply.is_ok() => VerifyOutcome::Verified {
                message: reply.message,
            },
            AuthorityReply::Answered(reply) => {
                VerifyOutcome::Rejected(reply.message.unwrap_or_else(|| NO_REASON.to_string()))
            }
        };

        Metrics::license_verify(outcome.metric_label());

        if outcome.is_ok() {
            self.store.set(VERIFIED_KEY, json!({ "verified": true }))?;
            info!(device_id = %identity.device_id, "License verified");
        } else {
            warn!(
                device_id = %identity.device_id,
                message = outcome.message(),
                "License verification failed"
            );
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{MockLicenseAuthority, VerifyResponse};
    use crate::identity::DEVICE_KEY;
    use fsig_persistence::{MemoryStore, PersistenceStore};
    use std::sync::Arc;

    fn gate_with(reply: AuthorityReply) -> (LicenseGate, Arc<MemoryStore>, Arc<MockLicenseAuthority>) {
        let store = Arc::new(MemoryStore::new());
        let authority = Arc::new(MockLicenseAuthority::new(reply));
        let gate = LicenseGate::new(store.clone(), authority.clone());
        (gate, store, authority)
    }

    #[test]
    fn test_unverified_by_default() {
        let (gate, _, _) = gate_with(AuthorityReply::Answered(VerifyResponse::ok(None)));
        assert!(!gate.is_verified());
        assert!(gate.session().is_none());
    }

    #[test]
    fn test_malformed_flag_reads_false() {
        let (gate, store, _) = gate_with(AuthorityReply::Answered(VerifyResponse::ok(None)));
        store.set(VERIFIED_KEY, json!({"verified": "yes"})).unwrap();
        assert!(!gate.is_verified());
        store.set(VERIFIED_KEY, json!([true])).unwrap();
        assert!(!gate.is_verified());
    }

    #[tokio::test]
    async fn test_empty_key_makes_no_network_call() {
        let (gate, store, authority) =
            gate_with(AuthorityReply::Answered(VerifyResponse::ok(None)));

        for key in ["", "   ", "\t\n"] {
            assert!(matches!(gate.verify(key).await, Err(LicenseError::EmptyKey)));
        }
        assert_eq!(authority.call_count(), 0);
        assert!(store.get(DEVICE_KEY).is_none());
        assert!(!gate.is_verified());
    }

    #[tokio::test]
    async fn test_success_persists_flag_and_uses_device_id() {
        let (gate, store, authority) =
            gate_with(AuthorityReply::Answered(VerifyResponse::ok(None)));

        let outcome = gate.verify("  KEY-123 ").await.unwrap();
        assert!(outcome.is_ok());
        assert!(gate.is_verified());
        assert!(gate.session().is_some());
        assert_eq!(store.get(VERIFIED_KEY), Some(json!({"verified": true})));

        let requests = authority.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].key, "KEY-123");
        let device = DeviceIdentity::load(store.as_ref()).unwrap();
        assert_eq!(requests[0].device_id, device.device_id);
    }

    #[tokio::test]
    async fn test_device_id_stable_across_attempts() {
        let (gate, _, authority) =
            gate_with(AuthorityReply::Unreachable("Cannot connect to server".to_string()));
        gate.verify("a").await.unwrap();
        gate.verify("b").await.unwrap();
        let requests = authority.requests();
        assert_eq!(requests[0].device_id, requests[1].device_id);
    }

    #[tokio::test]
    async fn test_http_error_leaves_flag_unset() {
        let (gate, store, _) = gate_with(AuthorityReply::Unreachable("HTTP 500".to_string()));

        let outcome = gate.verify("KEY").await.unwrap();
        assert!(!outcome.is_ok());
        assert_eq!(outcome.message(), "HTTP 500");
        assert!(!gate.is_verified());
        assert!(store.get(VERIFIED_KEY).is_none());
    }

    #[tokio::test]
    async fn test_server_rejection_passes_message_through() {
        let (gate, _, _) = gate_with(AuthorityReply::Answered(VerifyResponse::fail(
            "Key bound to another device",
        )));
        let outcome = gate.verify("KEY").await.unwrap();
        assert_eq!(
            outcome,
            VerifyOutcome::Rejected("Key bound to another device".to_string())
        );
        assert_eq!(outcome.to_string(), "Key rejected: Key bound to another device");
        assert!(!gate.is_verified());
    }

    #[tokio::test]
    async fn test_retry_after_failure_can_succeed() {
        let (gate, _, authority) = gate_with(AuthorityReply::Unreachable("HTTP 502".to_string()));
        assert!(!gate.verify("KEY").await.unwrap().is_ok());

        authority.set_next_reply(AuthorityReply::Answered(VerifyResponse::ok(Some(
            "welcome".to_string(),
        ))));
        let outcome = gate.verify("KEY").await.unwrap();
        assert!(outcome.is_ok());
        assert_eq!(outcome.message(), "welcome");
        assert!(gate.is_verified());
    }

    #[tokio::test]
    async fn test_flag_write_failure_is_error() {
        let (gate, store, _) = gate_with(AuthorityReply::Answered(VerifyResponse::ok(None)));
        DeviceIdentity::load_or_create(store.as_ref()).unwrap();
        store.set_fail_writes(true);
        assert!(matches!(
            gate.verify("KEY").await,
            Err(LicenseError::Persistence(_))
        ));
        assert!(!gate.is_verified());
    }
}
