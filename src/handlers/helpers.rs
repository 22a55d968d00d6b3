use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::models::AppState;
use crate::store::actions;
use crate::templates::BaseTemplate;

/// Seconds between reloads while a request is in flight.
pub const AUTO_REFRESH_SECS: &str = "2";

#[derive(Default)]
pub struct TemplateGlobals {
    pub api_hostname: String,
    pub backend_version: String,
    pub error: Option<String>,
    pub auto_refresh: bool,
}

pub fn build_template_globals(state: &AppState) -> TemplateGlobals {
    let snapshot = state.store.snapshot();
    TemplateGlobals {
        api_hostname: state.api_hostname(),
        backend_version: snapshot.version.clone().unwrap_or_default(),
        error: snapshot.error.clone(),
        auto_refresh: snapshot.is_anything_loading(),
    }
}

/// Fetch the backend version once; later pages reuse the stored value.
pub async fn ensure_version(state: &AppState) {
    if state.store.read(|s| s.version.is_none()) {
        actions::fetch_version(&state.store, &state.api).await;
    }
}

pub fn render_template<T: askama::Template + BaseTemplate>(t: T) -> Response {
    match t.render() {
        Ok(body) => {
            let mut resp = Html(body).into_response();
            if t.auto_refresh() {
                resp.headers_mut()
                    .insert(header::REFRESH, HeaderValue::from_static(AUTO_REFRESH_SECS));
            }
            resp
        }
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ReturnTo {
    pub return_to: Option<String>,
}

/// Redirect to a local path taken from a form, or `fallback`.
pub fn redirect_back(return_to: Option<&str>, fallback: &str) -> Redirect {
    match return_to {
        Some(path) if is_local_path(path) => Redirect::to(path),
        _ => Redirect::to(fallback),
    }
}

pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}
