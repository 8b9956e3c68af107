//! Key-value stores addressed by dot-delimited keys (`users.<discordId>`).
//!
//! Both implementations keep one JSON document in memory; `users.123` addresses
//! `{"users": {"123": ...}}` inside it.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::{Map, Value};

/// Look up a dot-delimited key. Missing keys and explicit `null` both read as absent.
pub(crate) fn lookup(doc: &Value, key: &str) -> Option<Value> {
    let mut cur = doc;
    for seg in key.split('.') {
        cur = cur.as_object()?.get(seg)?;
    }
    if cur.is_null() {
        None
    } else {
        Some(cur.clone())
    }
}

/// Write a dot-delimited key, creating (or replacing non-object) intermediate nodes.
pub(crate) fn insert(doc: &mut Value, key: &str, value: Value) {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut cur = doc;
    for seg in parents {
        if !cur.is_object() {
            *cur = Value::Object(Map::new());
        }
        let Value::Object(map) = cur else {
            return;
        };
        cur = map
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !cur.is_object() {
        *cur = Value::Object(Map::new());
    }
    if let Value::Object(map) = cur {
        map.insert(last.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keys_round_trip() {
        let mut doc = json!({});
        insert(&mut doc, "users.123", json!({"discordId": "123"}));
        insert(&mut doc, "users.456", json!({"discordId": "456"}));

        assert_eq!(
            doc,
            json!({"users": {"123": {"discordId": "123"}, "456": {"discordId": "456"}}})
        );
        assert_eq!(lookup(&doc, "users.123"), Some(json!({"discordId": "123"})));
        assert!(lookup(&doc, "users.789").is_none());
        assert!(lookup(&doc, "guilds.1").is_none());
    }

    #[test]
    fn replaces_scalar_parents() {
        let mut doc = json!({"users": "legacy"});
        insert(&mut doc, "users.1", json!(true));
        assert_eq!(doc, json!({"users": {"1": true}}));
    }

    #[test]
    fn null_reads_as_absent() {
        let doc = json!({"users": {"1": null}});
        assert!(lookup(&doc, "users.1").is_none());
    }

    #[test]
    fn lookup_through_scalar_is_absent() {
        let doc = json!({"users": 5});
        assert!(lookup(&doc, "users.1").is_none());
    }
}
