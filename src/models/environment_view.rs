use crate::models::{Environment, EnvironmentState, Instance};
use crate::store::StoreState;

/// One instance row as rendered by the dashboard.
#[derive(Clone, Debug)]
pub struct InstanceRow {
    pub id: String,
    pub name: String,
    pub instance_type: String,
    pub state: String,
    pub is_running: bool,
    pub loading: bool,
    pub vcpu: u32,
    pub memory_gb: f32,
}

#[derive(Clone, Debug)]
pub struct EnvironmentView {
    pub id: String,
    pub name: String,
    pub region: String,
    pub state: String,
    pub state_class: &'static str,
    pub running_instances: usize,
    pub total_instances: usize,
    pub total_vcpu: u32,
    pub total_memory_gb: f32,
    pub bills_saved: String,
    pub loading: bool,
    pub instances: Vec<InstanceRow>,
}

impl InstanceRow {
    fn build(inst: &Instance, state: &StoreState) -> Self {
        Self {
            id: inst.id.clone(),
            name: if inst.name.is_empty() { inst.instance_id.clone() } else { inst.name.clone() },
            instance_type: inst.instance_type.clone(),
            state: inst.state.to_string(),
            is_running: inst.is_running(),
            loading: state.is_instance_loading(&inst.id),
            vcpu: inst.vcpu,
            memory_gb: inst.memory_gb,
        }
    }
}

impl EnvironmentView {
    pub fn build(env: &Environment, state: &StoreState) -> Self {
        Self {
            id: env.id.clone(),
            name: env.name.clone(),
            region: env.region.clone(),
            state: env.state.to_string(),
            state_class: state_class(&env.state),
            running_instances: env.running_instances,
            total_instances: env.total_instances,
            total_vcpu: env.total_vcpu,
            total_memory_gb: env.total_memory_gb,
            bills_saved: env.bills_saved.clone().unwrap_or_default(),
            loading: state.is_environment_loading(&env.id),
            instances: env.instances.iter().map(|i| InstanceRow::build(i, state)).collect(),
        }
    }

    pub fn all(state: &StoreState) -> Vec<Self> {
        state.environments.iter().map(|e| Self::build(e, state)).collect()
    }
}

fn state_class(s: &EnvironmentState) -> &'static str {
    match s {
        EnvironmentState::Running => "state-running",
        EnvironmentState::Stopped => "state-stopped",
        EnvironmentState::Mixed => "state-mixed",
        EnvironmentState::Changing => "state-changing",
        EnvironmentState::Other(_) => "state-unknown",
    }
}
