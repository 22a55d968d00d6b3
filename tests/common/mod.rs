#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::{Notify, Semaphore};

use power_toggle::api::{ApiError, PowerToggleApi};
use power_toggle::models::{EnvList, Environment, EnvironmentState, Instance, InstanceState, VersionInfo};
use power_toggle::store::Store;

pub fn instance(id: &str, env_id: &str, state: InstanceState) -> Instance {
    Instance {
        id: id.to_string(),
        instance_id: format!("i-{}", id),
        instance_type: "t3.micro".into(),
        name: format!("{}-box", id),
        state,
        environment: env_id.to_string(),
        region: "us-east-1".into(),
        vcpu: 2,
        memory_gb: 1.0,
        pricing: 0.0104,
    }
}

/// An environment whose counters agree with its instance list.
pub fn environment(id: &str, name: &str, states: &[InstanceState]) -> Environment {
    let instances: Vec<Instance> = states
        .iter()
        .enumerate()
        .map(|(n, s)| instance(&format!("{}-{}", id, n), id, s.clone()))
        .collect();
    let running = instances.iter().filter(|i| i.state == InstanceState::Running).count();
    let stopped = instances.iter().filter(|i| i.state == InstanceState::Stopped).count();
    Environment {
        id: id.to_string(),
        provider: "aws".into(),
        region: "us-east-1".into(),
        name: name.to_string(),
        running_instances: running,
        stopped_instances: stopped,
        total_instances: instances.len(),
        total_vcpu: 2 * instances.len() as u32,
        total_memory_gb: instances.len() as f32,
        state: EnvironmentState::from_counts(running, instances.len()),
        instances,
        bills_accrued: None,
        bills_saved: None,
    }
}

pub fn env_list(envs: Vec<Environment>) -> EnvList {
    EnvList {
        env_list: envs,
        total_bills_accrued: None,
        total_bills_saved: None,
    }
}

fn set_all(env: &mut Environment, state: InstanceState) {
    for inst in env.instances.iter_mut() {
        inst.state = state.clone();
    }
    let rebuilt = environment(&env.id, &env.name, &env.instances.iter().map(|i| i.state.clone()).collect::<Vec<_>>());
    env.running_instances = rebuilt.running_instances;
    env.stopped_instances = rebuilt.stopped_instances;
    env.state = rebuilt.state;
}

/// In-memory backend for driving store actions.
pub struct FakeApi {
    store: Store,
    pub environments: Mutex<Vec<Environment>>,
    failure: Mutex<Option<(u16, String)>>,
    calls: Mutex<Vec<String>>,
    /// Loading flag of the call's target, as seen while the call runs.
    flags_seen: Mutex<Vec<bool>>,
    hold: Option<Arc<Notify>>,
    detail_gate: Option<Arc<Semaphore>>,
}

impl FakeApi {
    pub fn new(store: &Store, environments: Vec<Environment>) -> Self {
        Self {
            store: store.clone(),
            environments: Mutex::new(environments),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            flags_seen: Mutex::new(Vec::new()),
            hold: None,
            detail_gate: None,
        }
    }

    /// Every call fails with this status and raw body.
    pub fn failing(self, status: u16, body: &str) -> Self {
        *self.failure.lock().unwrap() = Some((status, body.to_string()));
        self
    }

    /// Start/stop calls wait for [`FakeApi::release`] before answering.
    pub fn held(mut self) -> Self {
        self.hold = Some(Arc::new(Notify::new()));
        self
    }

    /// Single-environment fetches wait until [`FakeApi::open_details`] lets them through.
    pub fn gate_details(mut self) -> Self {
        self.detail_gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn open_details(&self, n: usize) {
        if let Some(g) = &self.detail_gate {
            g.add_permits(n);
        }
    }

    pub fn release(&self) {
        if let Some(n) = &self.hold {
            n.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn flags_seen(&self) -> Vec<bool> {
        self.flags_seen.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self) -> Result<(), ApiError> {
        match &*self.failure.lock().unwrap() {
            Some((status, body)) => Err(ApiError::from_status(*status, body)),
            None => Ok(()),
        }
    }

    async fn wait_for_release(&self) {
        if let Some(n) = &self.hold {
            n.notified().await;
        }
    }

    async fn toggle_instance(&self, id: &str, verb: &str, state: InstanceState) -> Result<Value, ApiError> {
        self.record(format!("POST /instance/{}/{}", id, verb));
        self.flags_seen.lock().unwrap().push(self.store.read(|s| s.is_instance_loading(id)));
        self.wait_for_release().await;
        self.check()?;
        let mut envs = self.environments.lock().unwrap();
        for env in envs.iter_mut() {
            if let Some(inst) = env.instances.iter_mut().find(|i| i.id == id) {
                inst.state = state.clone();
            }
        }
        Ok(json!({"status": "OK"}))
    }

    async fn toggle_environment(&self, id: &str, verb: &str, state: InstanceState) -> Result<Value, ApiError> {
        self.record(format!("POST /env/{}/{}", id, verb));
        self.flags_seen.lock().unwrap().push(self.store.read(|s| s.is_environment_loading(id)));
        self.wait_for_release().await;
        self.check()?;
        let mut envs = self.environments.lock().unwrap();
        if let Some(env) = envs.iter_mut().find(|e| e.id == id) {
            set_all(env, state);
        }
        Ok(json!({"status": "OK"}))
    }
}

impl PowerToggleApi for FakeApi {
    async fn fetch_all_environments_summary(&self) -> Result<EnvList, ApiError> {
        self.record("GET /env/summary".into());
        self.check()?;
        let envs = self
            .environments
            .lock()
            .unwrap()
            .iter()
            .map(|e| Environment { instances: vec![], ..e.clone() })
            .collect();
        Ok(env_list(envs))
    }

    async fn fetch_all_environments_details(&self) -> Result<EnvList, ApiError> {
        self.record("GET /env/details".into());
        self.flags_seen.lock().unwrap().push(self.store.read(|s| s.is_app_loading()));
        self.check()?;
        Ok(env_list(self.environments.lock().unwrap().clone()))
    }

    async fn fetch_environment_details(&self, id: &str) -> Result<Environment, ApiError> {
        self.record(format!("GET /env/{}/details", id));
        if let Some(g) = &self.detail_gate {
            g.acquire().await.unwrap().forget();
        }
        self.check()?;
        self.environments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| ApiError::from_status(404, r#"{"error":"environment not found"}"#))
    }

    async fn start_environment(&self, id: &str) -> Result<Value, ApiError> {
        self.toggle_environment(id, "start", InstanceState::Running).await
    }

    async fn stop_environment(&self, id: &str) -> Result<Value, ApiError> {
        self.toggle_environment(id, "stop", InstanceState::Stopped).await
    }

    async fn start_instance(&self, id: &str) -> Result<Value, ApiError> {
        self.toggle_instance(id, "start", InstanceState::Running).await
    }

    async fn stop_instance(&self, id: &str) -> Result<Value, ApiError> {
        self.toggle_instance(id, "stop", InstanceState::Stopped).await
    }

    async fn get_version(&self) -> Result<VersionInfo, ApiError> {
        self.record("GET /version".into());
        self.check()?;
        Ok(VersionInfo {
            version: "1.4.0".into(),
            git_hash: "abc1234".into(),
            build_date: "2024-01-01".into(),
        })
    }

    async fn get_config(&self) -> Result<Value, ApiError> {
        self.record("GET /config".into());
        self.check()?;
        Ok(json!({"aws_regions": ["us-east-1"], "mock_enabled": true}))
    }

    async fn refresh(&self) -> Result<Value, ApiError> {
        self.record("POST /refresh".into());
        self.check()?;
        Ok(json!({"status": "OK"}))
    }
}

/// State behind the HTTP mock backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub environments: Arc<Mutex<Vec<Environment>>>,
    /// Instance or environment ids whose start/stop requests fail.
    pub failing: Arc<Mutex<HashSet<String>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new(environments: Vec<Environment>) -> Self {
        Self {
            environments: Arc::new(Mutex::new(environments)),
            ..Default::default()
        }
    }

    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn log(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({"error": msg}))).into_response()
}

async fn mock_summary(State(b): State<MockBackend>) -> Response {
    b.log("GET /env/summary".into());
    let envs: Vec<Environment> = b
        .environments
        .lock()
        .unwrap()
        .iter()
        .map(|e| Environment { instances: vec![], ..e.clone() })
        .collect();
    Json(env_list(envs)).into_response()
}

async fn mock_details(State(b): State<MockBackend>) -> Response {
    b.log("GET /env/details".into());
    let envs = b.environments.lock().unwrap().clone();
    Json(json!({"envList": envs, "totalBillsAccrued": "12.50", "totalBillsSaved": "3.75"})).into_response()
}

async fn mock_env_detail(State(b): State<MockBackend>, Path(id): Path<String>) -> Response {
    b.log(format!("GET /env/{}/details", id));
    let found = b.environments.lock().unwrap().iter().find(|e| e.id == id).cloned();
    match found {
        Some(env) => Json(env).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "environment not found"),
    }
}

async fn mock_env_toggle(State(b): State<MockBackend>, Path((id, verb)): Path<(String, String)>) -> Response {
    b.log(format!("POST /env/{}/{}", id, verb));
    if b.failing.lock().unwrap().contains(&id) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "aws is unreachable");
    }
    let target = if verb == "start" { InstanceState::Running } else { InstanceState::Stopped };
    let mut envs = b.environments.lock().unwrap();
    match envs.iter_mut().find(|e| e.id == id) {
        Some(env) => {
            set_all(env, target);
            Json(json!({"status": "OK"})).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "environment not found"),
    }
}

async fn mock_instance_toggle(State(b): State<MockBackend>, Path((id, verb)): Path<(String, String)>) -> Response {
    b.log(format!("POST /instance/{}/{}", id, verb));
    if b.failing.lock().unwrap().contains(&id) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "instance is locked");
    }
    Json(json!({"status": "OK"})).into_response()
}

async fn mock_version(State(b): State<MockBackend>) -> Response {
    b.log("GET /version".into());
    Json(json!({"version": "1.4.0", "git_hash": "abc1234", "build_date": "2024-01-01"})).into_response()
}

async fn mock_config(State(b): State<MockBackend>) -> Response {
    b.log("GET /config".into());
    Json(json!({"aws_polling_interval": 5, "aws_regions": ["us-east-1"], "mock_enabled": true})).into_response()
}

async fn mock_refresh(State(b): State<MockBackend>) -> Response {
    b.log("POST /refresh".into());
    Json(json!({"status": "OK"})).into_response()
}

/// Serve the mock backend on an ephemeral port; returns its API base URL.
pub async fn spawn_mock_backend(backend: MockBackend) -> String {
    let api = Router::new()
        .route("/env/summary", get(mock_summary))
        .route("/env/details", get(mock_details))
        .route("/env/:id/details", get(mock_env_detail))
        .route("/env/:id/:verb", post(mock_env_toggle))
        .route("/instance/:id/:verb", post(mock_instance_toggle))
        .route("/version", get(mock_version))
        .route("/config", get(mock_config))
        .route("/refresh", post(mock_refresh))
        .with_state(backend);
    let app = Router::new().nest("/api/v1", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}
