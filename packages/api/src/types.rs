//! Response bodies shared by the server functions and their callers.

use serde::{Deserialize, Serialize};

/// Returned when a walk-in is issued a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnqueueResponse {
    pub token_no: u64,
}

/// Outcome of a call-next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallNextResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_no: Option<u64>,
}

impl CallNextResponse {
    pub const NO_WAITING: &'static str = "No waiting patients!";

    pub fn called(token_no: u64) -> Self {
        Self {
            message: format!("Calling token {}", token_no),
            token_no: Some(token_no),
        }
    }

    pub fn no_waiting() -> Self {
        Self {
            message: Self::NO_WAITING.to_string(),
            token_no: None,
        }
    }
}

/// Token currently being served; `null` before anyone has been called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTokenResponse {
    pub token_no: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaResponse {
    pub eta_minutes: f64,
}

/// Issued staff session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Expiry as seconds since the Unix epoch.
    pub expires_at: i64,
}
