use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use crate::utils::encode_segment;
use crate::models::{EnvList, Environment};

impl ApiClient {
    /// `GET /env/summary`: every environment, without instance lists.
    pub async fn fetch_all_environments_summary(&self) -> Result<EnvList, ApiError> {
        self.call(Method::GET, "/env/summary").await
    }

    /// `GET /env/details`: every environment with its instances.
    pub async fn fetch_all_environments_details(&self) -> Result<EnvList, ApiError> {
        self.call(Method::GET, "/env/details").await
    }

    pub async fn fetch_environment_details(&self, id: &str) -> Result<Environment, ApiError> {
        self.call(Method::GET, &format!("/env/{}/details", encode_segment(id))).await
    }

    pub async fn start_environment(&self, id: &str) -> Result<Value, ApiError> {
        self.call(Method::POST, &format!("/env/{}/start", encode_segment(id))).await
    }

    pub async fn stop_environment(&self, id: &str) -> Result<Value, ApiError> {
        self.call(Method::POST, &format!("/env/{}/stop", encode_segment(id))).await
    }
}
