use askama::Template;

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub api_hostname: String,
    pub backend_version: String,
    pub error: Option<String>,
    pub auto_refresh: bool,
    pub what: String,
}

crate::impl_base_template!(NotFoundTemplate);
