/// Error types for backend API calls
use thiserror::Error;

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unexpected error occurred";

/// Errors that can occur while talking to the power-toggle backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or(FALLBACK_ERROR_MESSAGE))]
    Status {
        status: u16,
        /// The `error` field of the response body, when present
        message: Option<String>,
    },

    /// A 2xx response whose body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The single string surfaced to the operator for any failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Build a `Status` error from a raw error body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(|s| s.to_string()));
        ApiError::Status { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
