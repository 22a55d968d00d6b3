use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::models::Environment;

/// Everything the dashboard renders.
///
/// Environments are shared behind `Arc` so that a mutation touching one
/// environment hands the others back untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StoreState {
    pub environments: Vec<Arc<Environment>>,
    /// Environment id -> request in flight.
    pub environments_loading: HashMap<String, bool>,
    /// Instance id -> request in flight.
    pub instances_loading: HashMap<String, bool>,
    /// Full list fetch in flight.
    pub is_loading: bool,
    /// Message of the most recent failure, until cleared.
    pub error: Option<String>,
    pub version: Option<String>,
    pub config: Option<Value>,
    pub total_bills_accrued: Option<String>,
    pub total_bills_saved: Option<String>,
}
