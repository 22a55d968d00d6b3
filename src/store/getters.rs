use std::sync::Arc;

use super::state::StoreState;
use crate::models::{Environment, EnvironmentState};

impl StoreState {
    pub fn is_app_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_environment_loading(&self, id: &str) -> bool {
        self.environments_loading.get(id).copied().unwrap_or(false)
    }

    pub fn is_instance_loading(&self, id: &str) -> bool {
        self.instances_loading.get(id).copied().unwrap_or(false)
    }

    /// True while any request tracked by the store is in flight.
    pub fn is_anything_loading(&self) -> bool {
        self.is_loading
            || self.environments_loading.values().any(|f| *f)
            || self.instances_loading.values().any(|f| *f)
    }

    pub fn environment(&self, id: &str) -> Option<&Arc<Environment>> {
        self.environments.iter().find(|e| e.id == id)
    }

    /// The environment whose instance list contains `instance_id`.
    pub fn environment_for_instance(&self, instance_id: &str) -> Option<&Arc<Environment>> {
        self.environments.iter().find(|e| e.instance(instance_id).is_some())
    }

    fn is_environment_state(&self, id: &str, state: &EnvironmentState) -> bool {
        self.environment(id).map(|e| &e.state == state).unwrap_or(false)
    }

    pub fn is_environment_state_running(&self, id: &str) -> bool {
        self.is_environment_state(id, &EnvironmentState::Running)
    }

    pub fn is_environment_state_stopped(&self, id: &str) -> bool {
        self.is_environment_state(id, &EnvironmentState::Stopped)
    }

    pub fn is_environment_state_mixed(&self, id: &str) -> bool {
        self.is_environment_state(id, &EnvironmentState::Mixed)
    }

    pub fn is_environment_state_changing(&self, id: &str) -> bool {
        self.is_environment_state(id, &EnvironmentState::Changing)
    }
}
