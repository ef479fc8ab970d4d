use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// Identifiers and timestamps assigned by the source instance; the target
/// assigns its own.
pub const SOURCE_ONLY_FIELDS: [&str; 4] = ["id", "createdAt", "updatedAt", "publishedAt"];

/// Copy of `entry` without the source-only fields. Remaining fields keep their
/// order and values; non-object entries pass through as-is.
pub fn strip_source_fields(entry: &Value) -> Value {
    match entry {
        Value::Object(map) => {
            let kept: Map<String, Value> = map.iter()
                .filter(|(k, _)| !SOURCE_ONLY_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Value::Object(kept)
        }
        other => other.clone(),
    }
}

/// Reads an export file. `Ok(None)` when the file no longer exists.
pub fn load_entries(path: &Path) -> Result<Option<Vec<Value>>> {
    if !path.exists() { return Ok(None); }
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(entries_from_value(value)))
}

/// An array of entries, or an object wrapping one under `data`. Anything else has none.
fn entries_from_value(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_only_source_fields() {
        let entry = json!({
            "id": 3,
            "name": "Howrah Bridge",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "publishedAt": null,
            "documentId": "abc",
            "cover": {"id": 11, "url": "/uploads/a.jpg"}
        });
        let clean = strip_source_fields(&entry);
        assert_eq!(clean, json!({"name": "Howrah Bridge", "documentId": "abc", "cover": {"id": 11, "url": "/uploads/a.jpg"}}));
        let keys: Vec<&String> = clean.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "documentId", "cover"]);
    }

    #[test]
    fn non_objects_pass_through() {
        assert_eq!(strip_source_fields(&json!(5)), json!(5));
        assert_eq!(strip_source_fields(&json!("x")), json!("x"));
    }

    #[test]
    fn accepts_array_or_data_wrapper() {
        assert_eq!(entries_from_value(json!([{"a": 1}])), vec![json!({"a": 1})]);
        assert_eq!(entries_from_value(json!({"data": [{"a": 1}, {"a": 2}]})).len(), 2);
        assert!(entries_from_value(json!({"data": {"a": 1}})).is_empty());
        assert!(entries_from_value(json!({"title": "x"})).is_empty());
        assert!(entries_from_value(json!("text")).is_empty());
    }

    #[test]
    fn load_reports_missing_and_invalid_files() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_entries(&tmp.path().join("gone.json")).unwrap().is_none());

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(load_entries(&bad).is_err());

        let good = tmp.path().join("good.json");
        fs::write(&good, r#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(load_entries(&good).unwrap().unwrap().len(), 2);
    }
}
