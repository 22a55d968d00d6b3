use askama::Template;
use crate::models::EnvironmentView;

#[derive(Template)]
#[template(path = "environments.html")]
pub struct EnvironmentsTemplate {
    pub api_hostname: String,
    pub backend_version: String,
    pub error: Option<String>,
    pub auto_refresh: bool,
    pub is_loading: bool,
    pub environments: Vec<EnvironmentView>,
    pub total_bills_accrued: String,
    pub total_bills_saved: String,
}

crate::impl_base_template!(EnvironmentsTemplate);
