//! Synchronous state transitions. Every change to `StoreState` goes through
//! [`apply`]; nothing here performs I/O or can fail.

use std::sync::Arc;

use serde_json::Value;

use super::state::StoreState;
use crate::models::{EnvList, Environment, InstanceState};

#[derive(Clone, Debug)]
pub enum Mutation {
    SetVersion(String),
    SetConfig(Value),
    /// Replace the whole environment list along with the bill totals.
    SetEnvironments(EnvList),
    /// Replace one environment by id.
    SetEnvironment { id: String, data: Environment },
    SetEnvironmentLoading { id: String, flag: bool },
    SetInstanceLoading { id: String, flag: bool },
    SetIsLoading(bool),
    SetError(Option<String>),
    SetInstanceStateStatus {
        environment_id: String,
        instance_id: String,
        status: InstanceState,
    },
}

pub fn apply(mut state: StoreState, mutation: Mutation) -> StoreState {
    match mutation {
        Mutation::SetVersion(v) => state.version = Some(v),
        Mutation::SetConfig(c) => state.config = Some(c),
        Mutation::SetEnvironments(list) => {
            state.total_bills_accrued = list.total_bills_accrued.clone();
            state.total_bills_saved = list.total_bills_saved.clone();
            state.environments = list.into_shared();
        }
        Mutation::SetEnvironment { id, data } => {
            let data = Arc::new(data);
            state.environments = state
                .environments
                .iter()
                .map(|env| if env.id == id { Arc::clone(&data) } else { Arc::clone(env) })
                .collect();
        }
        // Cleared flags are removed so the maps only hold requests in flight.
        Mutation::SetEnvironmentLoading { id, flag } => {
            if flag {
                state.environments_loading.insert(id, true);
            } else {
                state.environments_loading.remove(&id);
            }
        }
        Mutation::SetInstanceLoading { id, flag } => {
            if flag {
                state.instances_loading.insert(id, true);
            } else {
                state.instances_loading.remove(&id);
            }
        }
        Mutation::SetIsLoading(flag) => state.is_loading = flag,
        Mutation::SetError(err) => state.error = err.filter(|e| !e.is_empty()),
        Mutation::SetInstanceStateStatus { environment_id, instance_id, status } => {
            state.environments =
                set_instance_state_status(&state.environments, &environment_id, &instance_id, &status);
        }
    }
    state
}

/// Flip one instance's state and recompute its environment's counters and
/// aggregate state. Unknown environment or instance ids leave the list as is.
/// Environments other than the target are returned as the same `Arc`.
pub fn set_instance_state_status(
    environments: &[Arc<Environment>],
    environment_id: &str,
    instance_id: &str,
    status: &InstanceState,
) -> Vec<Arc<Environment>> {
    environments
        .iter()
        .map(|env| {
            if env.id != environment_id {
                return Arc::clone(env);
            }
            match env.with_instance_state(instance_id, status) {
                Some(updated) => Arc::new(updated),
                None => Arc::clone(env),
            }
        })
        .collect()
}
