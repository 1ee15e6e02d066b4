//! License gate for future-signals.
//!
//! A key is verified once per installation against a remote authority,
//! correlated by a random device identifier. Success is persisted and never
//! re-checked; report generation is only reachable through a
//! `VerifiedSession` obtained from the gate.

pub mod authority;
pub mod config;
pub mod error;
pub mod gate;
pub mod identity;

pub use authority::{
    AuthorityReply, DynLicenseAuthority, HttpLicenseAuthority, LicenseAuthority,
    MockLicenseAuthority, VerifyRequest, VerifyResponse,
};
pub use config::LicenseConfig;
pub use error::{LicenseError, LicenseResult};
pub use gate::{LicenseGate, VerifiedSession, VerifyOutcome, VERIFIED_KEY};
pub use identity::{DeviceIdentity, DEVICE_KEY};
