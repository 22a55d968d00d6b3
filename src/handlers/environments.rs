use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;

use crate::models::{AppState, EnvironmentView};
use crate::store::{actions, PowerAction};
use crate::templates::{EnvironmentDetailTemplate, EnvironmentsTemplate, NotFoundTemplate};
use super::helpers::{build_template_globals, ensure_version, redirect_back, render_template, ReturnTo, TemplateGlobals};

pub async fn environments_list(State(state): State<AppState>) -> impl IntoResponse {
    ensure_version(&state).await;
    actions::fetch_all_environments_details(&state.store, &state.api).await;

    let snapshot = state.store.snapshot();
    let TemplateGlobals {
        api_hostname,
        backend_version,
        error,
        auto_refresh,
    } = build_template_globals(&state);

    render_template(EnvironmentsTemplate {
        api_hostname,
        backend_version,
        error,
        auto_refresh,
        is_loading: snapshot.is_app_loading(),
        environments: EnvironmentView::all(&snapshot),
        total_bills_accrued: snapshot.total_bills_accrued.clone().unwrap_or_default(),
        total_bills_saved: snapshot.total_bills_saved.clone().unwrap_or_default(),
    })
}

pub async fn environment_detail(
    State(state): State<AppState>,
    Path(env_id): Path<String>,
) -> Response {
    ensure_version(&state).await;
    // A single-environment fetch only replaces an environment already in the list.
    if state.store.read(|s| s.environment(&env_id).is_none()) {
        actions::fetch_all_environments_details(&state.store, &state.api).await;
    }
    actions::reload_environment(&state.store, &state.api, &env_id).await;

    let snapshot = state.store.snapshot();
    let TemplateGlobals {
        api_hostname,
        backend_version,
        error,
        auto_refresh,
    } = build_template_globals(&state);

    match snapshot.environment(&env_id) {
        Some(env) => render_template(EnvironmentDetailTemplate {
            api_hostname,
            backend_version,
            error,
            auto_refresh,
            env: EnvironmentView::build(env, &snapshot),
        }),
        None => {
            let page = render_template(NotFoundTemplate {
                api_hostname,
                backend_version,
                error,
                auto_refresh,
                what: format!("Environment {}", env_id),
            });
            (StatusCode::NOT_FOUND, page).into_response()
        }
    }
}

pub async fn environment_start_post(
    State(state): State<AppState>,
    Path(env_id): Path<String>,
    Form(form): Form<ReturnTo>,
) -> impl IntoResponse {
    spawn_environment_action(&state, &env_id, PowerAction::Start);
    redirect_back(form.return_to.as_deref(), "/")
}

pub async fn environment_stop_post(
    State(state): State<AppState>,
    Path(env_id): Path<String>,
    Form(form): Form<ReturnTo>,
) -> impl IntoResponse {
    spawn_environment_action(&state, &env_id, PowerAction::Stop);
    redirect_back(form.return_to.as_deref(), "/")
}

// Runs in the background so the redirected page can show the loading state.
fn spawn_environment_action(state: &AppState, env_id: &str, action: PowerAction) {
    let state = state.clone();
    let env_id = env_id.to_string();
    tokio::spawn(async move {
        let outcome = actions::toggle_environment(&state.store, &state.api, &env_id, action).await;
        tracing::info!(environment = %env_id, %action, ?outcome, "Environment action finished");
    });
}
