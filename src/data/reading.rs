//! Scalar reading and timestamp types shared by the normalizer and aggregator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single sensor value that is either present or explicitly missing.
///
/// A missing reading is never folded into `0.0`; a device reporting a real
/// zero and a device that did not report at all stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Reading {
    Value(f64),
    #[default]
    Missing,
}

impl Reading {
    /// Build a reading from an optional number. Non-finite values are missing.
    pub fn from_f64(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Reading::Value(v),
            _ => Reading::Missing,
        }
    }

    /// Leniently read a number from a JSON value.
    ///
    /// Accepts JSON numbers and numeric strings. Anything else is missing.
    pub fn from_json(value: Option<&Value>) -> Self {
        let number = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Self::from_f64(number)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        Self::from_f64(value)
    }
}

impl From<Reading> for Option<f64> {
    fn from(reading: Reading) -> Self {
        reading.value()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{}", v),
            Reading::Missing => f.write_str("N/A"),
        }
    }
}

/// Record time as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Parse a raw timestamp field.
    ///
    /// Numbers and numeric strings are epoch milliseconds; other strings
    /// must be RFC 3339. Returns `None` for anything else.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| float_millis(n.as_f64()?)).map(Self),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(millis) = s.parse::<i64>() {
                    return Some(Self(millis));
                }
                if let Some(millis) = s.parse::<f64>().ok().and_then(float_millis) {
                    return Some(Self(millis));
                }
                DateTime::parse_from_rfc3339(s).ok().map(|dt| Self(dt.timestamp_millis()))
            }
            _ => None,
        }
    }

    /// Wall-clock label used on chart x axes (`HH:MM:SS`, UTC).
    pub fn label(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| self.0.to_string())
    }
}

fn float_millis(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reading_from_json() {
        assert_eq!(Reading::from_json(Some(&json!(72))), Reading::Value(72.0));
        assert_eq!(Reading::from_json(Some(&json!("36.6"))), Reading::Value(36.6));
        assert_eq!(Reading::from_json(Some(&json!(0))), Reading::Value(0.0));
        assert_eq!(Reading::from_json(Some(&json!(null))), Reading::Missing);
        assert_eq!(Reading::from_json(Some(&json!("abc"))), Reading::Missing);
        assert_eq!(Reading::from_json(None), Reading::Missing);
    }

    #[test]
    fn test_reading_serializes_missing_as_null() {
        let json = serde_json::to_string(&vec![Reading::Value(1.5), Reading::Missing]).unwrap();
        assert_eq!(json, "[1.5,null]");
        assert_eq!(Reading::Missing.to_string(), "N/A");
    }

    #[test]
    fn test_timestamp_parse_formats() {
        assert_eq!(Timestamp::parse(&json!(1700000000000_i64)).unwrap().as_millis(), 1700000000000);
        assert_eq!(Timestamp::parse(&json!(1500.9)).unwrap().as_millis(), 1500);
        assert_eq!(Timestamp::parse(&json!("42")).unwrap().as_millis(), 42);
        assert_eq!(
            Timestamp::parse(&json!("1970-01-01T00:00:01Z")).unwrap().as_millis(),
            1000
        );
        assert!(Timestamp::parse(&json!("yesterday")).is_none());
        assert!(Timestamp::parse(&json!(true)).is_none());
        assert!(Timestamp::parse(&json!(null)).is_none());
    }

    #[test]
    fn test_timestamp_label() {
        assert_eq!(Timestamp::from_millis(3_723_000).label(), "01:02:03");
    }
}
