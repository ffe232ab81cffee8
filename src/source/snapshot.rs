//! The raw snapshot format returned by the store.
//!
//! A snapshot maps opaque record ids (push keys) to raw record objects. The
//! map keeps the key order the store returned, which is the tie-breaker when
//! two records share a timestamp.

use serde_json::{Map, Value};

use crate::error::SourceError;

/// A complete snapshot of the telemetry node, keyed by record id.
pub type TelemetrySnapshot = Map<String, Value>;

/// Interpret a decoded JSON body as a snapshot.
///
/// A `null` body means the node does not exist yet and is an empty snapshot.
pub fn snapshot_from_value(value: Value) -> Result<TelemetrySnapshot, SourceError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(TelemetrySnapshot::new()),
        other => Err(SourceError::Parse(format!(
            "expected an object of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "-Nabc": {
                "timestamp": 1700000000000,
                "heart_rate": 72,
                "temperature": 36.6,
                "imu": { "ax": 0.1, "ay": 0.2, "az": 9.8, "gx": 0.0, "gy": 0.0, "gz": 0.0 },
                "location": { "lat": 1.0, "lng": 2.0 },
                "emergency": false
            },
            "-Naaa": { "timestamp": 1700000001000 }
        }"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let snapshot = snapshot_from_value(value).unwrap();
        assert_eq!(snapshot.len(), 2);

        let keys: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["-Nabc", "-Naaa"]);
    }

    #[test]
    fn test_null_is_empty_snapshot() {
        assert!(snapshot_from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_is_parse_error() {
        let err = snapshot_from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
