use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use crate::utils::encode_segment;

impl ApiClient {
    pub async fn start_instance(&self, id: &str) -> Result<Value, ApiError> {
        self.call(Method::POST, &format!("/instance/{}/start", encode_segment(id))).await
    }

    pub async fn stop_instance(&self, id: &str) -> Result<Value, ApiError> {
        self.call(Method::POST, &format!("/instance/{}/stop", encode_segment(id))).await
    }
}
