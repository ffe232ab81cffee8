//! Raw store records and their normalized form.
//!
//! The store has carried two incompatible record shapes over time. Each shape
//! is its own variant of [`RawRecord`], resolved once when the record is
//! read, so nothing downstream has to probe for fields.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::reading::{Reading, Timestamp};

/// A raw record in one of the known schema variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Per-axis IMU readings nested under `imu`.
    Imu(ImuRecord),
    /// Precomputed acceleration/gyroscope magnitudes plus `fall_detected`.
    Magnitude(MagnitudeRecord),
}

impl RawRecord {
    /// Resolve the schema variant of a raw JSON entry.
    ///
    /// Fails only when the entry is not a JSON object. Every leaf field is
    /// read leniently, so a wrong-typed field becomes missing instead of
    /// rejecting the record.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(ref fields) = value else {
            return Err(serde::de::Error::custom("record is not a JSON object"));
        };

        let has_magnitude_fields = ["acceleration", "gyroscope", "fall_detected"]
            .iter()
            .any(|key| fields.contains_key(*key));

        if !fields.contains_key("imu") && has_magnitude_fields {
            serde_json::from_value(value).map(RawRecord::Magnitude)
        } else {
            serde_json::from_value(value).map(RawRecord::Imu)
        }
    }

    pub fn timestamp(&self) -> Option<&Value> {
        match self {
            RawRecord::Imu(r) => r.timestamp.as_ref(),
            RawRecord::Magnitude(r) => r.timestamp.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImuRecord {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub heart_rate: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub temperature: Reading,
    #[serde(default, deserialize_with = "lenient_group")]
    pub imu: Option<RawImu>,
    #[serde(default, deserialize_with = "lenient_group")]
    pub location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub emergency: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fall_detected: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MagnitudeRecord {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub heart_rate: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub temperature: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub acceleration: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub gyroscope: Reading,
    #[serde(default, deserialize_with = "lenient_group")]
    pub location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub emergency: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fall_detected: Option<bool>,
}

/// The `imu` group: accelerometer (`a*`) and gyroscope (`g*`) axes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawImu {
    #[serde(default, deserialize_with = "lenient_reading")]
    pub ax: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub ay: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub az: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub gx: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub gy: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub gz: Reading,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawLocation {
    #[serde(default, deserialize_with = "lenient_reading")]
    pub lat: Reading,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub lng: Reading,
}

fn lenient_reading<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Reading, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(Reading::from_json(Some(&value)))
}

fn lenient_group<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => Some(b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Three-axis vector of readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Axes {
    pub x: Reading,
    pub y: Reading,
    pub z: Reading,
}

impl Axes {
    /// Euclidean norm of the three axes, missing if any axis is missing.
    pub fn magnitude(&self) -> Reading {
        match (self.x.value(), self.y.value(), self.z.value()) {
            (Some(x), Some(y), Some(z)) => Reading::Value((x * x + y * y + z * z).sqrt()),
            _ => Reading::Missing,
        }
    }
}

/// GPS position as reported by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Location {
    pub lat: Reading,
    pub lng: Reading,
}

/// One telemetry point with every field explicitly present or missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Store key of the record.
    pub id: String,
    pub timestamp: Timestamp,
    pub heart_rate: Reading,
    pub temperature: Reading,
    /// Per-axis acceleration, when the schema variant carries axes.
    pub acceleration: Option<Axes>,
    /// Per-axis angular rate, when the schema variant carries axes.
    pub gyroscope: Option<Axes>,
    pub acceleration_magnitude: Reading,
    pub gyroscope_magnitude: Reading,
    pub location: Option<Location>,
    pub emergency: bool,
    pub fall_detected: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_imu_record() {
        let raw = RawRecord::from_value(json!({
            "timestamp": 1,
            "heart_rate": 80,
            "imu": { "ax": 1.0, "ay": 2.0, "az": 2.0 }
        }))
        .unwrap();

        let RawRecord::Imu(record) = raw else {
            panic!("expected imu variant");
        };
        let imu = record.imu.unwrap();
        assert_eq!(imu.ax, Reading::Value(1.0));
        assert_eq!(imu.gx, Reading::Missing);
        assert!(record.emergency.is_none());
        assert!(record.fall_detected.is_none());
    }

    #[test]
    fn test_imu_record_keeps_fall_flag() {
        let raw = RawRecord::from_value(json!({
            "timestamp": 1,
            "imu": { "ax": 0.0 },
            "fall_detected": "true"
        }))
        .unwrap();

        let RawRecord::Imu(record) = raw else {
            panic!("expected imu variant");
        };
        assert_eq!(record.fall_detected, Some(true));
    }

    #[test]
    fn test_classify_magnitude_record() {
        let raw = RawRecord::from_value(json!({
            "timestamp": 1,
            "acceleration": 9.81,
            "gyroscope": "0.5",
            "fall_detected": 1
        }))
        .unwrap();

        let RawRecord::Magnitude(record) = raw else {
            panic!("expected magnitude variant");
        };
        assert_eq!(record.acceleration, Reading::Value(9.81));
        assert_eq!(record.gyroscope, Reading::Value(0.5));
        assert_eq!(record.fall_detected, Some(true));
    }

    #[test]
    fn test_bare_record_defaults_to_imu_variant() {
        let raw = RawRecord::from_value(json!({ "timestamp": 1 })).unwrap();
        assert!(matches!(raw, RawRecord::Imu(ImuRecord { imu: None, .. })));
    }

    #[test]
    fn test_wrong_typed_group_is_missing() {
        let raw = RawRecord::from_value(json!({
            "timestamp": 1,
            "imu": "broken",
            "location": [1, 2],
            "emergency": "maybe"
        }))
        .unwrap();

        let RawRecord::Imu(record) = raw else {
            panic!("expected imu variant");
        };
        assert!(record.imu.is_none());
        assert!(record.location.is_none());
        assert!(record.emergency.is_none());
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert!(RawRecord::from_value(json!("garbage")).is_err());
        assert!(RawRecord::from_value(json!(42)).is_err());
    }

    #[test]
    fn test_axes_magnitude() {
        let axes = Axes {
            x: Reading::Value(3.0),
            y: Reading::Value(0.0),
            z: Reading::Value(4.0),
        };
        assert_eq!(axes.magnitude(), Reading::Value(5.0));

        let partial = Axes {
            z: Reading::Missing,
            ..axes
        };
        assert_eq!(partial.magnitude(), Reading::Missing);
    }
}
