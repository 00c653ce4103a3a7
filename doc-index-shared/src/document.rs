//! Document records and payload validation.

use serde_json::{Map, Value};

/// A document as stored in the engine: field name to JSON value.
///
/// Records returned to callers are detached copies; nothing is cached.
pub type DocumentRecord = Map<String, Value>;

/// Check whether a raw payload is a valid JSON document.
///
/// Documents, mappings and settings are all JSON objects, so arrays, scalars and
/// malformed text are rejected.
pub fn is_valid_json(text: &str) -> bool {
    parse_record(text).is_some()
}

/// Parse a raw payload into a record, returning `None` unless it is a JSON object.
pub fn parse_record(text: &str) -> Option<DocumentRecord> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_objects() {
        assert!(is_valid_json(r#"{"name":"alpha","count":1}"#));
        assert!(is_valid_json("{}"));
        assert!(is_valid_json(r#" { "nested": { "a": [1, 2] } } "#));
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(!is_valid_json(""));
        assert!(!is_valid_json("not json"));
        assert!(!is_valid_json(r#"{"unterminated": "#));
        assert!(!is_valid_json("[1, 2, 3]"));
        assert!(!is_valid_json("42"));
        assert!(!is_valid_json("null"));
    }

    #[test]
    fn test_parse_record_fields() {
        let record = parse_record(r#"{"name":"alpha","count":3}"#).unwrap();
        assert_eq!(record["name"], "alpha");
        assert_eq!(record["count"], 3);
    }
}
