use serde_json::Value;

/// Flatten a config value into one display cell.
pub fn value_to_short_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) if arr.is_empty() => "—".into(),
        Value::Array(arr) => arr
            .iter()
            .map(value_to_short_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{}: {}", key, value_to_short_string(val)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => "—".into(),
    }
}

/// `(key, display)` pairs of a JSON object, sorted by key. Non-objects yield one `value` row.
pub fn object_rows(value: &Value) -> Vec<(String, String)> {
    match value.as_object() {
        Some(obj) => {
            let mut rows: Vec<(String, String)> = obj
                .iter()
                .map(|(k, v)| (k.clone(), value_to_short_string(v)))
                .collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            rows
        }
        None => vec![("value".to_string(), value_to_short_string(value))],
    }
}
