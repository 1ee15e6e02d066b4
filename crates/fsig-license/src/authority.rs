//! Remote license authority.
//!
//! Wire contract: `POST {verify_url}` with `{"device_id": ..., "key": ...}`,
//! answered by `{"status": "ok" | ..., "message": ...}`.

use crate::config::LicenseConfig;
use crate::error::{LicenseError, LicenseResult};
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Message used when the server cannot be reached.
pub const CANNOT_CONNECT: &str = "Cannot connect to server";

/// Message used when a 2xx reply carries no usable JSON.
pub const EMPTY_RESPONSE: &str = "Empty response from server";

/// Verification request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyRequest {
    pub device_id: String,
    pub key: String,
}

/// Verification response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifyResponse {
    pub fn ok(message: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Interpret a JSON body.
    ///
    /// `null`, `false`, `0`, `""`, `[]` and `{}` count as empty and yield
    /// `None`. Non-string messages are kept in their JSON form.
    pub fn from_json(value: &Value) -> Option<Self> {
        let empty = match value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
        };
        if empty {
            return None;
        }

        let status = value
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = value.get("message").and_then(|m| match m {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

        Some(Self { status, message })
    }
}

/// What the authority said, or why it could not be asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityReply {
    /// The server answered with a body (success or rejection).
    Answered(VerifyResponse),
    /// Transport failure or non-2xx status. Retryable.
    Unreachable(String),
}

/// Remote authority that judges license keys.
pub trait LicenseAuthority: Send + Sync {
    /// Submit one verification request. Never retried internally.
    fn submit(&self, request: VerifyRequest) -> BoxFuture<'_, AuthorityReply>;
}

/// Arc wrapper for LicenseAuthority trait objects.
pub type DynLicenseAuthority = Arc<dyn LicenseAuthority>;

/// HTTP implementation of the authority.
pub struct HttpLicenseAuthority {
    client: Client,
    verify_url: String,
}

impl HttpLicenseAuthority {
    pub fn new(config: &LicenseConfig) -> LicenseResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LicenseError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            verify_url: config.verify_url.clone(),
        })
    }

    async fn post(&self, request: &VerifyRequest) -> AuthorityReply {
        let response = match self
            .client
            .post(&self.verify_url)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %self.verify_url, error = %e, "Error connecting to server");
                return AuthorityReply::Unreachable(CANNOT_CONNECT.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.verify_url, %status, "Verification endpoint returned error status");
            return AuthorityReply::Unreachable(format!("HTTP {}", status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read verification response");
                return AuthorityReply::Unreachable(CANNOT_CONNECT.to_string());
            }
        };

        let parsed = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| VerifyResponse::from_json(&value));

        match parsed {
            Some(reply) => {
                debug!(status = %reply.status, "Verification response received");
                AuthorityReply::Answered(reply)
            }
            None => {
                warn!(body_len = body.len(), "Verification response was empty or not JSON");
                AuthorityReply::Answered(VerifyResponse::fail(EMPTY_RESPONSE))
            }
        }
    }
}

impl LicenseAuthority for HttpLicenseAuthority {
    fn submit(&self, request: VerifyRequest) -> BoxFuture<'_, AuthorityReply> {
        Box::pin(async move { self.post(&request).await })
    }
}

/// Mock authority for testing.
#[derive(Debug)]
pub struct MockLicenseAuthority {
    /// Recorded submissions for verification.
    requests: Mutex<Vec<VerifyRequest>>,
    /// Reply returned for every submission.
    next_reply: Mutex<AuthorityReply>,
}

impl Default for MockLicenseAuthority {
    fn default() -> Self {
        Self::new(AuthorityReply::Answered(VerifyResponse::ok(None)))
    }
}

impl MockLicenseAuthority {
    pub fn new(reply: AuthorityReply) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            next_reply: Mutex::new(reply),
        }
    }

    pub fn set_next_reply(&self, reply: AuthorityReply) {
        *self.next_reply.lock() = reply;
    }

    /// Recorded submissions.
    pub fn requests(&self) -> Vec<VerifyRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl LicenseAuthority for MockLicenseAuthority {
    fn submit(&self, request: VerifyRequest) -> BoxFuture<'_, AuthorityReply> {
        Box::pin(async move {
            self.requests.lock().push(request);
            self.next_reply.lock().clone()
        })
    }
}
