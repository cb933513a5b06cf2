//! Flattening of form validation errors.
//!
//! Validation failures come back as a tree mirroring the submitted form:
//!
//! ```json
//! {"errors": ["..."], "children": {
//!     "shippingAddress": {"children": {"lastName": {"errors": ["This value is too long."]}}},
//!     "language": []
//! }}
//! ```
//!
//! Only branches that actually hold messages are kept.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Flattens a `children` tree into `field.path -> messages`.
///
/// List children are addressed by index (`carriers.0.name`). Empty
/// branches are dropped.
#[must_use]
pub fn flat_children_errors(children: &Value) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    collect_children(children, None, &mut fields);
    fields
}

fn collect_children(
    node: &Value,
    prefix: Option<&str>,
    fields: &mut BTreeMap<String, Vec<String>>,
) {
    let entries: Vec<(String, &Value)> = match node {
        Value::Object(map) => map.iter().map(|(key, value)| (key.clone(), value)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => return,
    };

    for (key, value) in entries {
        let Value::Object(field) = value else {
            continue;
        };
        let path = prefix.map_or_else(|| key.clone(), |prefix| format!("{prefix}.{key}"));

        if let Some(messages) = field.get("errors").and_then(Value::as_array) {
            if !messages.is_empty() {
                fields
                    .entry(path.clone())
                    .or_default()
                    .extend(messages.iter().map(value_to_text));
            }
        }

        if let Some(grandchildren) = field.get("children") {
            collect_children(grandchildren, Some(&path), fields);
        }
    }
}

/// Removes empty lists, maps and strings from a JSON tree.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn trim_empty_collections(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.iter().filter_map(trim_empty_collections).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .iter()
                .filter_map(|(key, value)| {
                    trim_empty_collections(value).map(|value| (key.clone(), value))
                })
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other.clone()),
    }
}

/// Renders flattened fields as `path: message, message; path: message`.
#[must_use]
pub fn describe_fields(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(path, messages)| format!("{path}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Returns a JSON string's content, or the JSON text of any other value.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
