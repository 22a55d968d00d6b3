use crate::api::ApiClient;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    /// Shared by every request handler and every spawned action.
    pub store: Store,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            store: Store::new(),
            custom_css: None,
        }
    }

    pub fn api_hostname(&self) -> String {
        crate::utils::hostname_from_url(self.api.base_url())
    }
}
