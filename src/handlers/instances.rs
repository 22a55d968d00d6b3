use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Form;
use serde::Deserialize;

use crate::models::AppState;
use crate::store::{actions, PowerAction};
use crate::utils::encode_segment;
use super::helpers::redirect_back;

#[derive(Deserialize, Debug)]
pub struct InstanceActionForm {
    /// Environment the instance belongs to.
    pub env_id: String,
    pub return_to: Option<String>,
}

pub async fn instance_start_post(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Form(form): Form<InstanceActionForm>,
) -> impl IntoResponse {
    spawn_instance_action(&state, &form.env_id, &instance_id, PowerAction::Start);
    redirect_back(form.return_to.as_deref(), &format!("/env/{}", encode_segment(&form.env_id)))
}

pub async fn instance_stop_post(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Form(form): Form<InstanceActionForm>,
) -> impl IntoResponse {
    spawn_instance_action(&state, &form.env_id, &instance_id, PowerAction::Stop);
    redirect_back(form.return_to.as_deref(), &format!("/env/{}", encode_segment(&form.env_id)))
}

fn spawn_instance_action(state: &AppState, env_id: &str, instance_id: &str, action: PowerAction) {
    let state = state.clone();
    let env_id = env_id.to_string();
    let instance_id = instance_id.to_string();
    tokio::spawn(async move {
        let outcome =
            actions::toggle_instance(&state.store, &state.api, &env_id, &instance_id, action).await;
        tracing::info!(environment = %env_id, instance = %instance_id, %action, ?outcome, "Instance action finished");
    });
}
