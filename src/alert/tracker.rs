//! Edge-triggered emergency state.
//!
//! # State Machine
//!
//! ```text
//!            predicate(true) / emit event
//!   Normal ─────────────────────────────▶ Alerting
//!     ▲  │ predicate(false)                │  ▲ predicate(true)
//!     │  └──────┘                          │  └──────┘
//!     └────────────────────────────────────┘
//!                 predicate(false)
//! ```
//!
//! Only Normal → Alerting produces an [`EmergencyEvent`]. A sustained
//! emergency is reported once, until it clears and trips again.

use std::fmt;

use serde::Serialize;

use crate::data::{Location, NormalizedRecord, Reading, Timestamp};

/// Current alert state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    #[default]
    Normal,
    Alerting,
}

impl AlertState {
    pub fn is_alerting(&self) -> bool {
        matches!(self, AlertState::Alerting)
    }
}

/// Position attached to an emergency event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventLocation {
    Known { lat: f64, lng: f64 },
    Unknown,
}

impl EventLocation {
    /// Known only when both coordinates are present.
    pub fn from_record(location: Option<&Location>) -> Self {
        match location.map(|l| (l.lat.value(), l.lng.value())) {
            Some((Some(lat), Some(lng))) => EventLocation::Known { lat, lng },
            _ => EventLocation::Unknown,
        }
    }
}

impl fmt::Display for EventLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLocation::Known { lat, lng } => write!(f, "({}, {})", lat, lng),
            EventLocation::Unknown => f.write_str("(N/A, N/A)"),
        }
    }
}

/// The rising edge of the emergency predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyEvent {
    pub record_id: String,
    pub timestamp: Timestamp,
    pub heart_rate: Reading,
    pub temperature: Reading,
    pub location: EventLocation,
}

impl EmergencyEvent {
    fn from_record(record: &NormalizedRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            timestamp: record.timestamp,
            heart_rate: record.heart_rate,
            temperature: record.temperature,
            location: EventLocation::from_record(record.location.as_ref()),
        }
    }
}

/// Tracks [`AlertState`] across cycles.
#[derive(Debug, Clone, Default)]
pub struct EmergencyTracker {
    state: AlertState,
    use_fall_detect: bool,
}

impl EmergencyTracker {
    pub fn new(use_fall_detect: bool) -> Self {
        Self {
            state: AlertState::Normal,
            use_fall_detect,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// `emergency`, or `fall_detected` when enabled and reported.
    pub fn predicate(&self, record: &NormalizedRecord) -> bool {
        record.emergency || (self.use_fall_detect && record.fall_detected == Some(true))
    }

    /// Apply one predicate value. Returns `true` on the rising edge.
    pub fn transition(&mut self, predicate: bool) -> bool {
        let (next, edge) = match (self.state, predicate) {
            (AlertState::Normal, true) => (AlertState::Alerting, true),
            (AlertState::Alerting, true) => (AlertState::Alerting, false),
            (_, false) => (AlertState::Normal, false),
        };
        self.state = next;
        edge
    }

    /// Evaluate the latest record of a cycle.
    ///
    /// Callers must skip cycles without records; an absent record is not a
    /// `false` reading.
    pub fn evaluate(&mut self, latest: &NormalizedRecord) -> Option<EmergencyEvent> {
        let predicate = self.predicate(latest);
        self.transition(predicate).then(|| EmergencyEvent::from_record(latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(emergency: bool, fall_detected: Option<bool>) -> NormalizedRecord {
        NormalizedRecord {
            id: "r".to_string(),
            timestamp: Timestamp::from_millis(0),
            heart_rate: Reading::Value(140.0),
            temperature: Reading::Value(38.2),
            acceleration: None,
            gyroscope: None,
            acceleration_magnitude: Reading::Missing,
            gyroscope_magnitude: Reading::Missing,
            location: Some(Location {
                lat: Reading::Value(1.0),
                lng: Reading::Value(2.0),
            }),
            emergency,
            fall_detected,
        }
    }

    #[test]
    fn test_rising_edges_only() {
        let mut tracker = EmergencyTracker::new(true);
        let sequence = [false, false, true, true, true, false, true];

        let mut edges = Vec::new();
        for (i, &predicate) in sequence.iter().enumerate() {
            if tracker.transition(predicate) {
                edges.push(i + 1);
            }
        }

        assert_eq!(edges, vec![3, 7]);
        assert_eq!(tracker.state(), AlertState::Alerting);
    }

    #[test]
    fn test_alerting_clears_on_false() {
        let mut tracker = EmergencyTracker::new(true);
        assert!(tracker.transition(true));
        assert!(!tracker.transition(false));
        assert_eq!(tracker.state(), AlertState::Normal);
    }

    #[test]
    fn test_fall_detect_participates_when_enabled() {
        let with = EmergencyTracker::new(true);
        let without = EmergencyTracker::new(false);
        let fall = record(false, Some(true));

        assert!(with.predicate(&fall));
        assert!(!without.predicate(&fall));
        assert!(!with.predicate(&record(false, None)));
        assert!(without.predicate(&record(true, Some(false))));
    }

    #[test]
    fn test_event_captures_record_values() {
        let mut tracker = EmergencyTracker::new(true);
        let event = tracker.evaluate(&record(true, None)).unwrap();

        assert_eq!(event.heart_rate, Reading::Value(140.0));
        assert_eq!(event.temperature, Reading::Value(38.2));
        assert_eq!(event.location, EventLocation::Known { lat: 1.0, lng: 2.0 });
        assert!(tracker.evaluate(&record(true, None)).is_none());
    }

    #[test]
    fn test_partial_location_is_unknown() {
        let location = Location {
            lat: Reading::Value(1.0),
            lng: Reading::Missing,
        };
        assert_eq!(EventLocation::from_record(Some(&location)), EventLocation::Unknown);
        assert_eq!(EventLocation::from_record(None), EventLocation::Unknown);
        assert_eq!(EventLocation::Unknown.to_string(), "(N/A, N/A)");
    }
}
