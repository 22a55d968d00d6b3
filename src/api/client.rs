use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use yansi::Paint;

use super::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Typed HTTP client for the power-toggle backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("power-toggle/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: crate::config::sanitize_base_url(&base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Core request function: exactly one outbound call, no retries.
    /// Non-2xx responses become `ApiError::Status` carrying the body's `error` field.
    pub(crate) async fn call<T: DeserializeOwned>(&self, method: Method, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        // --- Curl Logging ---
        let parts = [
            Paint::new("curl").fg(yansi::Color::Green).bold().to_string(),
            format!("-X {}", Paint::new(method.as_str()).fg(yansi::Color::Yellow).bold()),
            format!("'{}'", Paint::new(&url).fg(yansi::Color::Cyan)),
        ];
        log_output(format!("Request:\n{}", parts.join(" ")));
        // --------------------

        tracing::info!(method = %method, endpoint, "API Request");
        let resp = match self.client.request(method, &url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%e, endpoint, "API request failed");
                return Err(e.into());
            }
        };
        let status = resp.status();
        let body = resp.text().await?;

        // Grayed out so the request line stands out
        log_output(format!("Response:\n{}", Paint::new(&body).rgb(100, 100, 100)));
        tracing::info!(status = status.as_u16(), endpoint, "API Response");

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        let raw = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(raw).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
