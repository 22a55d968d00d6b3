//! Request-orchestrating actions.
//!
//! Each action sets a loading flag, issues its backend call(s) and commits
//! the resulting mutations. Failures stop here: they are written to the
//! store's error slot and reported as [`ActionOutcome::Failed`], never
//! returned as errors. Loading flags are owned by a [`super::LoadingGuard`]
//! and cleared when the action finishes, whichever path it takes.

use std::fmt;

use super::{Mutation, Store};
use crate::api::{ApiError, PowerToggleApi};
use crate::models::InstanceState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The backend call failed; the store's error slot holds the message.
    Failed,
    /// A request for the same target was already in flight; nothing was sent.
    AlreadyInFlight,
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerAction {
    Start,
    Stop,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Start => "start",
            PowerAction::Stop => "stop",
        }
    }

    /// Instance state the action is expected to produce.
    pub fn target_state(&self) -> InstanceState {
        match self {
            PowerAction::Start => InstanceState::Running,
            PowerAction::Stop => InstanceState::Stopped,
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fail(store: &Store, action: &str, e: &ApiError) -> ActionOutcome {
    tracing::warn!(%e, action, "Action failed");
    store.commit(Mutation::SetError(Some(e.user_message())));
    ActionOutcome::Failed
}

fn in_flight(action: &str, target: &str) -> ActionOutcome {
    tracing::warn!(action, target, "Request already in flight; ignoring");
    ActionOutcome::AlreadyInFlight
}

pub async fn fetch_version<A: PowerToggleApi>(store: &Store, api: &A) -> ActionOutcome {
    match api.get_version().await {
        Ok(info) => {
            store.commit(Mutation::SetVersion(info.version));
            ActionOutcome::Completed
        }
        Err(e) => fail(store, "fetch_version", &e),
    }
}

pub async fn fetch_config<A: PowerToggleApi>(store: &Store, api: &A) -> ActionOutcome {
    match api.get_config().await {
        Ok(config) => {
            store.commit(Mutation::SetConfig(config));
            ActionOutcome::Completed
        }
        Err(e) => fail(store, "fetch_config", &e),
    }
}

/// Summary listing; lightweight, so it does not drive the app-wide flag.
pub async fn fetch_all_environments_summary<A: PowerToggleApi>(store: &Store, api: &A) -> ActionOutcome {
    match api.fetch_all_environments_summary().await {
        Ok(list) => {
            store.commit(Mutation::SetEnvironments(list));
            ActionOutcome::Completed
        }
        Err(e) => fail(store, "fetch_all_environments_summary", &e),
    }
}

pub async fn fetch_all_environments_details<A: PowerToggleApi>(store: &Store, api: &A) -> ActionOutcome {
    let Some(_loading) = store.begin_app_loading() else {
        return in_flight("fetch_all_environments_details", "*");
    };
    load_all_environments(store, api).await
}

/// Ask the backend to re-poll its provider, then reload every environment.
pub async fn refresh<A: PowerToggleApi>(store: &Store, api: &A) -> ActionOutcome {
    let Some(_loading) = store.begin_app_loading() else {
        return in_flight("refresh", "*");
    };
    if let Err(e) = api.refresh().await {
        return fail(store, "refresh", &e);
    }
    load_all_environments(store, api).await
}

async fn load_all_environments<A: PowerToggleApi>(store: &Store, api: &A) -> ActionOutcome {
    match api.fetch_all_environments_details().await {
        Ok(list) => {
            store.commit(Mutation::SetEnvironments(list));
            ActionOutcome::Completed
        }
        Err(e) => fail(store, "fetch_all_environments_details", &e),
    }
}

pub async fn fetch_environment_details<A: PowerToggleApi>(store: &Store, api: &A, id: &str) -> ActionOutcome {
    let Some(_loading) = store.begin_environment_loading(id) else {
        return in_flight("fetch_environment_details", id);
    };
    load_environment(store, api, id).await
}

/// Re-read one environment for display without touching its loading flag,
/// so a page view never turns a start/stop click into a duplicate.
pub async fn reload_environment<A: PowerToggleApi>(store: &Store, api: &A, id: &str) -> ActionOutcome {
    load_environment(store, api, id).await
}

async fn load_environment<A: PowerToggleApi>(store: &Store, api: &A, id: &str) -> ActionOutcome {
    match api.fetch_environment_details(id).await {
        Ok(data) => {
            store.commit(Mutation::SetEnvironment { id: id.to_string(), data });
            ActionOutcome::Completed
        }
        Err(e) => fail(store, "fetch_environment_details", &e),
    }
}

pub async fn start_environment<A: PowerToggleApi>(store: &Store, api: &A, id: &str) -> ActionOutcome {
    toggle_environment(store, api, id, PowerAction::Start).await
}

pub async fn stop_environment<A: PowerToggleApi>(store: &Store, api: &A, id: &str) -> ActionOutcome {
    toggle_environment(store, api, id, PowerAction::Stop).await
}

/// On success the environment is re-fetched and replaced wholesale; the
/// flag stays set until that fetch settles too.
pub async fn toggle_environment<A: PowerToggleApi>(
    store: &Store,
    api: &A,
    id: &str,
    action: PowerAction,
) -> ActionOutcome {
    let Some(_loading) = store.begin_environment_loading(id) else {
        return in_flight(action.as_str(), id);
    };
    tracing::info!(environment = id, %action, "Toggling environment");
    let result = match action {
        PowerAction::Start => api.start_environment(id).await,
        PowerAction::Stop => api.stop_environment(id).await,
    };
    match result {
        Ok(_) => load_environment(store, api, id).await,
        Err(e) => fail(store, action.as_str(), &e),
    }
}

pub async fn start_instance<A: PowerToggleApi>(
    store: &Store,
    api: &A,
    environment_id: &str,
    instance_id: &str,
) -> ActionOutcome {
    toggle_instance(store, api, environment_id, instance_id, PowerAction::Start).await
}

pub async fn stop_instance<A: PowerToggleApi>(
    store: &Store,
    api: &A,
    environment_id: &str,
    instance_id: &str,
) -> ActionOutcome {
    toggle_instance(store, api, environment_id, instance_id, PowerAction::Stop).await
}

/// Applies the requested state optimistically, then confirms it when the
/// backend accepts the request or restores the previous state when it fails.
pub async fn toggle_instance<A: PowerToggleApi>(
    store: &Store,
    api: &A,
    environment_id: &str,
    instance_id: &str,
    action: PowerAction,
) -> ActionOutcome {
    let Some(_loading) = store.begin_instance_loading(instance_id) else {
        return in_flight(action.as_str(), instance_id);
    };
    let requested = action.target_state();
    let previous = store
        .read(|s| {
            s.environment(environment_id)
                .and_then(|env| env.instance(instance_id))
                .map(|i| i.state.clone())
        })
        .unwrap_or_else(|| requested.opposite());
    let set_status = |status: InstanceState| Mutation::SetInstanceStateStatus {
        environment_id: environment_id.to_string(),
        instance_id: instance_id.to_string(),
        status,
    };

    tracing::info!(environment = environment_id, instance = instance_id, %action, "Toggling instance");
    store.commit(set_status(requested.clone()));
    let result = match action {
        PowerAction::Start => api.start_instance(instance_id).await,
        PowerAction::Stop => api.stop_instance(instance_id).await,
    };
    match result {
        Ok(_) => {
            store.commit(set_status(requested));
            ActionOutcome::Completed
        }
        Err(e) => {
            let outcome = fail(store, action.as_str(), &e);
            store.commit(set_status(previous));
            outcome
        }
    }
}

pub fn clear_error(store: &Store) {
    store.commit(Mutation::SetError(None));
}
