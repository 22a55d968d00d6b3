use askama::Template;
use crate::models::EnvironmentView;

#[derive(Template)]
#[template(path = "environment_detail.html")]
pub struct EnvironmentDetailTemplate {
    pub api_hostname: String,
    pub backend_version: String,
    pub error: Option<String>,
    pub auto_refresh: bool,
    pub env: EnvironmentView,
}

crate::impl_base_template!(EnvironmentDetailTemplate);
