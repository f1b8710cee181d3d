//! Shared accessors and builders for config entries.
//!
//! Entries stay as raw [`serde_json::Value`] objects so unrelated fields pass
//! through untouched; these helpers cover the handful of paths the merge
//! strategies actually inspect.

use serde_json::{Value, json};

/// The identifying key of an entry, when present.
pub fn config_key(entry: &Value) -> Option<&str> {
    entry.get("config_key").and_then(Value::as_str)
}

/// The campaign UUID an entry's conditions reference, when present.
pub fn campaign_id_value(entry: &Value) -> Option<&str> {
    entry
        .get("conditions")
        .and_then(|conditions| conditions.get("campaign_id"))
        .and_then(|condition| condition.get("value"))
        .and_then(Value::as_str)
}

/// Whether an entry has a condition of the given kind.
pub fn has_condition(entry: &Value, condition: &str) -> bool {
    entry
        .get("conditions")
        .and_then(|conditions| conditions.get(condition))
        .is_some()
}

/// Whether an entry belongs to a campaign: its key equals the campaign name
/// or carries the `name_0` / `name_1_N` suffix convention.
pub fn belongs_to_campaign(entry: &Value, name: &str) -> bool {
    match config_key(entry) {
        Some(key) => key == name || key.starts_with(&format!("{name}_")),
        None => false,
    }
}

/// `{"type": "STRING", "operator": "EQ", "value": ...}` condition.
pub fn string_eq(value: &str) -> Value {
    json!({
        "type": "STRING",
        "operator": "EQ",
        "value": value
    })
}

/// `{"type": "STRING", "operator": "IN", "value": [...]}` condition.
pub fn string_in(values: &[&str]) -> Value {
    json!({
        "type": "STRING",
        "operator": "IN",
        "value": values
    })
}

/// `{"type": "NUMBER", "operator": "GTE", "value": ...}` condition.
pub fn number_gte(value: u64) -> Value {
    json!({
        "type": "NUMBER",
        "operator": "GTE",
        "value": value
    })
}

/// The dynamic-attribute block targeting a campaign's streak type.
pub fn streak_type_attribute(operator: &str, value: Value) -> Value {
    json!({
        "attribute": {
            "namespace": "heimdall",
            "name": "heimdall.dynamic_attributes.streak_type"
        },
        "type": "STRING",
        "operator": operator,
        "value": value
    })
}
