use axum::{
    routing::{get, post},
    Router,
};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

// Embed the default stylesheet in the binary
pub const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_router(state: AppState) -> Router {
    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    Router::new()
        .route("/", get(handlers::environments::environments_list))
        .route("/env/:env_id", get(handlers::environments::environment_detail))
        .route("/env/:env_id/start", post(handlers::environments::environment_start_post))
        .route("/env/:env_id/stop", post(handlers::environments::environment_stop_post))
        .route("/instance/:instance_id/start", post(handlers::instances::instance_start_post))
        .route("/instance/:instance_id/stop", post(handlers::instances::instance_stop_post))
        .route("/refresh", post(handlers::system::refresh_post))
        .route("/error/clear", post(handlers::system::clear_error_post))
        .route("/about", get(handlers::system::about_get))
        .route("/state", get(handlers::system::state_get))
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(CONTENT_TYPE, "text/css")], css) }
            })
            .layer(
                ServiceBuilder::new().layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=3600"),
                )),
            ),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
