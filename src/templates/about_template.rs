use askama::Template;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub api_hostname: String,
    pub backend_version: String,
    pub error: Option<String>,
    pub auto_refresh: bool,
    pub client_version: &'static str,
    pub config_rows: Vec<(String, String)>,
}

crate::impl_base_template!(AboutTemplate);
