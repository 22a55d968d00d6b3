use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Form, Json};

use crate::models::AppState;
use crate::store::actions;
use crate::templates::AboutTemplate;
use super::helpers::{build_template_globals, redirect_back, render_template, ReturnTo, TemplateGlobals};

pub async fn about_get(State(state): State<AppState>) -> impl IntoResponse {
    actions::fetch_version(&state.store, &state.api).await;
    actions::fetch_config(&state.store, &state.api).await;

    let config_rows = state
        .store
        .read(|s| s.config.as_ref().map(crate::utils::object_rows))
        .unwrap_or_default();
    let TemplateGlobals {
        api_hostname,
        backend_version,
        error,
        auto_refresh,
    } = build_template_globals(&state);

    render_template(AboutTemplate {
        api_hostname,
        backend_version,
        error,
        auto_refresh,
        client_version: env!("CARGO_PKG_VERSION"),
        config_rows,
    })
}

pub async fn refresh_post(State(state): State<AppState>) -> impl IntoResponse {
    actions::refresh(&state.store, &state.api).await;
    redirect_back(None, "/")
}

pub async fn clear_error_post(
    State(state): State<AppState>,
    Form(form): Form<ReturnTo>,
) -> impl IntoResponse {
    actions::clear_error(&state.store);
    redirect_back(form.return_to.as_deref(), "/")
}

/// The whole store as JSON, for scripts and debugging.
pub async fn state_get(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.snapshot())
}
