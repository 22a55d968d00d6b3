use std::future::Future;

use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{EnvList, Environment, VersionInfo};

/// The backend capabilities the store actions are written against.
///
/// `ApiClient` is the production implementation; tests drive the actions
/// with in-memory doubles.
pub trait PowerToggleApi: Send + Sync {
    fn fetch_all_environments_summary(&self) -> impl Future<Output = Result<EnvList, ApiError>> + Send;
    fn fetch_all_environments_details(&self) -> impl Future<Output = Result<EnvList, ApiError>> + Send;
    fn fetch_environment_details(&self, id: &str) -> impl Future<Output = Result<Environment, ApiError>> + Send;
    fn start_environment(&self, id: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;
    fn stop_environment(&self, id: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;
    fn start_instance(&self, id: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;
    fn stop_instance(&self, id: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;
    fn get_version(&self) -> impl Future<Output = Result<VersionInfo, ApiError>> + Send;
    fn get_config(&self) -> impl Future<Output = Result<Value, ApiError>> + Send;
    fn refresh(&self) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

impl PowerToggleApi for ApiClient {
    async fn fetch_all_environments_summary(&self) -> Result<EnvList, ApiError> {
        ApiClient::fetch_all_environments_summary(self).await
    }

    async fn fetch_all_environments_details(&self) -> Result<EnvList, ApiError> {
        ApiClient::fetch_all_environments_details(self).await
    }

    async fn fetch_environment_details(&self, id: &str) -> Result<Environment, ApiError> {
        ApiClient::fetch_environment_details(self, id).await
    }

    async fn start_environment(&self, id: &str) -> Result<Value, ApiError> {
        ApiClient::start_environment(self, id).await
    }

    async fn stop_environment(&self, id: &str) -> Result<Value, ApiError> {
        ApiClient::stop_environment(self, id).await
    }

    async fn start_instance(&self, id: &str) -> Result<Value, ApiError> {
        ApiClient::start_instance(self, id).await
    }

    async fn stop_instance(&self, id: &str) -> Result<Value, ApiError> {
        ApiClient::stop_instance(self, id).await
    }

    async fn get_version(&self) -> Result<VersionInfo, ApiError> {
        ApiClient::get_version(self).await
    }

    async fn get_config(&self) -> Result<Value, ApiError> {
        ApiClient::get_config(self).await
    }

    async fn refresh(&self) -> Result<Value, ApiError> {
        ApiClient::refresh(self).await
    }
}
