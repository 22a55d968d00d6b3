mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{environment, spawn_mock_backend, MockBackend};
use power_toggle::api::set_silent;
use power_toggle::models::InstanceState;
use power_toggle::routes::build_router;
use power_toggle::store::{Mutation, StoreState};
use power_toggle::{ApiClient, AppState};
use tower::ServiceExt;

use InstanceState::{Running, Stopped};

async fn dashboard(backend: &MockBackend) -> (Router, AppState) {
    set_silent(true);
    let base = spawn_mock_backend(backend.clone()).await;
    let state = AppState::new(ApiClient::new(base).unwrap());
    (build_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Spawned actions may not have started yet, so wait for their effect, not just idleness.
async fn wait_for(state: &AppState, done: impl Fn(&StoreState) -> bool) {
    for _ in 0..300 {
        if state.store.read(|s| !s.is_anything_loading() && done(s)) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("background action never settled");
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_environments_page_lists_everything() {
    let backend = MockBackend::new(vec![
        environment("a", "dev", &[Running, Stopped]),
        environment("b", "qa", &[Stopped]),
    ]);
    let (app, _) = dashboard(&backend).await;

    let resp = app.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"<a href="/env/a">dev</a>"#));
    assert!(html.contains(r#"<a href="/env/b">qa</a>"#));
    assert!(html.contains("mixed"));
    assert!(html.contains("v1.4.0"));
    assert!(html.contains("3.75"));
}

#[tokio::test]
async fn test_environment_detail_shows_instances() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Running, Stopped])]);
    let (app, _) = dashboard(&backend).await;

    let resp = app.oneshot(get("/env/a")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("a-0-box"));
    assert!(html.contains("a-1-box"));
    assert!(backend.requests().contains(&"GET /env/a/details".to_string()));
}

#[tokio::test]
async fn test_unknown_environment_is_not_found() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Running])]);
    let (app, state) = dashboard(&backend).await;

    let resp = app.oneshot(get("/env/zzz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.store.snapshot().error.as_deref(), Some("environment not found"));
}

#[tokio::test]
async fn test_state_endpoint_serializes_store() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Running])]);
    let (app, state) = dashboard(&backend).await;
    state
        .store
        .commit(Mutation::SetEnvironments(common::env_list(vec![environment("a", "dev", &[Running])])));

    let resp = app.oneshot(get("/state")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["environments"][0]["id"], "a");
    assert_eq!(json["environments"][0]["state"], "running");
    assert_eq!(json["is_loading"], false);
    assert_eq!(json["error"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_clear_error_redirects_back() {
    let backend = MockBackend::new(vec![]);
    let (app, state) = dashboard(&backend).await;
    state.store.commit(Mutation::SetError(Some("boom".into())));

    let resp = app
        .oneshot(post_form("/error/clear", "return_to=%2Fabout"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/about");
    assert_eq!(state.store.snapshot().error, None);
}

#[tokio::test]
async fn test_clear_error_ignores_external_return_target() {
    let backend = MockBackend::new(vec![]);
    let (app, _) = dashboard(&backend).await;

    let resp = app
        .oneshot(post_form("/error/clear", "return_to=https%3A%2F%2Fevil.example%2F"))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_instance_start_runs_in_background() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Stopped, Stopped])]);
    let (app, state) = dashboard(&backend).await;
    app.clone().oneshot(get("/env/a")).await.unwrap();

    let resp = app
        .oneshot(post_form("/instance/a-0/start", "env_id=a"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/env/a");

    wait_for(&state, |s| {
        s.environment("a")
            .and_then(|e| e.instance("a-0"))
            .map(|i| i.state == Running)
            .unwrap_or(false)
    })
    .await;
    let snapshot = state.store.snapshot();
    let env = snapshot.environment("a").unwrap();
    assert_eq!(env.instance("a-0").unwrap().state, Running);
    assert!(snapshot.is_environment_state_mixed("a"));
    assert!(backend.requests().contains(&"POST /instance/a-0/start".to_string()));
}

#[tokio::test]
async fn test_failed_instance_start_surfaces_error() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Stopped])]);
    backend.fail("a-0");
    let (app, state) = dashboard(&backend).await;
    app.clone().oneshot(get("/")).await.unwrap();

    app.clone()
        .oneshot(post_form("/instance/a-0/start", "env_id=a"))
        .await
        .unwrap();
    wait_for(&state, |s| s.error.is_some()).await;

    let snapshot = state.store.snapshot();
    assert_eq!(snapshot.error.as_deref(), Some("instance is locked"));
    assert!(snapshot.is_environment_state_stopped("a"));

    let html = body_text(app.oneshot(get("/env/a")).await.unwrap()).await;
    assert!(html.contains("instance is locked"));
}

#[tokio::test]
async fn test_environment_stop_refetches_detail() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Running, Running])]);
    let (app, state) = dashboard(&backend).await;
    app.clone().oneshot(get("/")).await.unwrap();

    let resp = app
        .oneshot(post_form("/env/a/stop", "return_to=%2Fenv%2Fa"))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/env/a");

    wait_for(&state, |s| s.is_environment_state_stopped("a")).await;
    let requests = backend.requests();
    let stop = requests.iter().position(|r| r == "POST /env/a/stop").unwrap();
    let detail = requests.iter().position(|r| r == "GET /env/a/details").unwrap();
    assert!(stop < detail);
}

#[tokio::test]
async fn test_refresh_and_about() {
    let backend = MockBackend::new(vec![environment("a", "dev", &[Running])]);
    let (app, _) = dashboard(&backend).await;

    let resp = app.clone().oneshot(post_form("/refresh", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(backend.requests().starts_with(&["POST /refresh".to_string(), "GET /env/details".to_string()]));

    let html = body_text(app.oneshot(get("/about")).await.unwrap()).await;
    assert!(html.contains("aws_polling_interval"));
    assert!(html.contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_stylesheet_is_cached() {
    let backend = MockBackend::new(vec![]);
    let (app, _) = dashboard(&backend).await;

    let resp = app.oneshot(get("/static/styles.css")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css");
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "public, max-age=3600");
}

#[tokio::test]
async fn test_ids_with_slashes_round_trip_through_pages() {
    let backend = MockBackend::new(vec![environment("team/dev", "dev", &[Stopped])]);
    let (app, _) = dashboard(&backend).await;

    let html = body_text(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(html.contains(r#"href="/env/team%2Fdev""#));

    let resp = app.clone().oneshot(get("/env/team%2Fdev")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(backend.requests().contains(&"GET /env/team/dev/details".to_string()));

    let resp = app
        .oneshot(post_form("/instance/team%2Fdev-0/start", "env_id=team%2Fdev"))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/env/team%2Fdev");
}
