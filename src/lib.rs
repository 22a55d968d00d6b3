//! Operator client for an aws-power-toggle backend.
//!
//! The [`store`] holds the environment list, per-entity loading flags and the
//! last error; its actions drive the typed [`api`] client. The web dashboard
//! ([`routes`], [`handlers`], [`templates`]) and the `power-toggle` binary both
//! render that store.

pub mod api;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod templates;
pub mod utils;

pub use api::{ApiClient, ApiError, PowerToggleApi};
pub use models::AppState;
pub use store::{ActionOutcome, Store, StoreState};
