use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::VersionInfo;

impl ApiClient {
    pub async fn get_version(&self) -> Result<VersionInfo, ApiError> {
        self.call(Method::GET, "/version").await
    }

    /// Backend configuration, passed through untouched.
    pub async fn get_config(&self) -> Result<Value, ApiError> {
        self.call(Method::GET, "/config").await
    }

    /// Asks the backend to re-poll its provider. Returns `{"status":"OK"}` on success.
    pub async fn refresh(&self) -> Result<Value, ApiError> {
        self.call(Method::POST, "/refresh").await
    }
}
