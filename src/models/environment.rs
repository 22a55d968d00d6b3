use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Aggregate state of an environment as reported by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnvironmentState {
    Running,
    Stopped,
    Mixed,
    Changing,
    Other(String),
}

impl EnvironmentState {
    pub fn as_str(&self) -> &str {
        match self {
            EnvironmentState::Running => "running",
            EnvironmentState::Stopped => "stopped",
            EnvironmentState::Mixed => "mixed",
            EnvironmentState::Changing => "changing",
            EnvironmentState::Other(s) => s,
        }
    }

    /// Three-way classification used when an instance changes state locally.
    /// An environment without instances counts as stopped.
    pub fn from_counts(running: usize, total: usize) -> Self {
        if total == 0 || running == 0 {
            EnvironmentState::Stopped
        } else if running == total {
            EnvironmentState::Running
        } else {
            EnvironmentState::Mixed
        }
    }
}

impl From<String> for EnvironmentState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "running" => EnvironmentState::Running,
            "stopped" => EnvironmentState::Stopped,
            "mixed" => EnvironmentState::Mixed,
            "changing" => EnvironmentState::Changing,
            _ => EnvironmentState::Other(s),
        }
    }
}

impl From<EnvironmentState> for String {
    fn from(s: EnvironmentState) -> Self {
        s.as_str().to_string()
    }
}

impl Default for EnvironmentState {
    fn default() -> Self {
        EnvironmentState::Stopped
    }
}

impl fmt::Display for EnvironmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single instance. AWS transitional states are kept as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Other(String),
}

impl InstanceState {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceState::Pending => "pending",
            InstanceState::Running => "running",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
            InstanceState::ShuttingDown => "shutting-down",
            InstanceState::Terminated => "terminated",
            InstanceState::Other(s) => s,
        }
    }

    /// The status a start/stop request would flip this one to.
    pub fn opposite(&self) -> Self {
        match self {
            InstanceState::Running => InstanceState::Stopped,
            _ => InstanceState::Running,
        }
    }
}

impl From<String> for InstanceState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => InstanceState::Pending,
            "running" => InstanceState::Running,
            "stopping" => InstanceState::Stopping,
            "stopped" => InstanceState::Stopped,
            "shutting-down" => InstanceState::ShuttingDown,
            "terminated" => InstanceState::Terminated,
            _ => InstanceState::Other(s),
        }
    }
}

impl From<InstanceState> for String {
    fn from(s: InstanceState) -> Self {
        s.as_str().to_string()
    }
}

impl Default for InstanceState {
    fn default() -> Self {
        InstanceState::Stopped
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: InstanceState,
    /// Id of the owning environment.
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub vcpu: u32,
    #[serde(default)]
    pub memory_gb: f32,
    #[serde(default)]
    pub pricing: f64,
}

impl Instance {
    pub fn is_running(&self) -> bool {
        self.state == InstanceState::Running
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub name: String,
    /// Empty for summary responses.
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(default)]
    pub running_instances: usize,
    #[serde(default)]
    pub stopped_instances: usize,
    #[serde(default)]
    pub total_instances: usize,
    #[serde(default)]
    pub total_vcpu: u32,
    #[serde(default)]
    pub total_memory_gb: f32,
    #[serde(default)]
    pub state: EnvironmentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bills_accrued: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bills_saved: Option<String>,
}

impl Environment {
    pub fn instance(&self, instance_id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id == instance_id)
    }

    /// Returns a copy with one instance's state replaced and the
    /// counters and aggregate state recomputed from the instance list.
    /// `None` when the instance is not part of this environment.
    pub fn with_instance_state(&self, instance_id: &str, status: &InstanceState) -> Option<Environment> {
        self.instance(instance_id)?;
        let instances: Vec<Instance> = self
            .instances
            .iter()
            .map(|i| {
                if i.id == instance_id {
                    Instance { state: status.clone(), ..i.clone() }
                } else {
                    i.clone()
                }
            })
            .collect();
        let running = instances.iter().filter(|i| i.state == InstanceState::Running).count();
        let stopped = instances.iter().filter(|i| i.state == InstanceState::Stopped).count();
        let total = instances.len();
        Some(Environment {
            running_instances: running,
            stopped_instances: stopped,
            total_instances: total,
            state: EnvironmentState::from_counts(running, total),
            instances,
            ..self.clone()
        })
    }
}

/// Envelope returned by the environment list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvList {
    #[serde(rename = "envList", default)]
    pub env_list: Vec<Environment>,
    #[serde(rename = "totalBillsAccrued", default, skip_serializing_if = "Option::is_none")]
    pub total_bills_accrued: Option<String>,
    #[serde(rename = "totalBillsSaved", default, skip_serializing_if = "Option::is_none")]
    pub total_bills_saved: Option<String>,
}

impl EnvList {
    pub fn into_shared(self) -> Vec<Arc<Environment>> {
        self.env_list.into_iter().map(Arc::new).collect()
    }
}
