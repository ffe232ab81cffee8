//! Snapshot normalization.
//!
//! Turns one [`TelemetrySnapshot`] into records sorted by timestamp. Records
//! that cannot be placed in time are dropped and reported as warnings.

use serde::Serialize;
use tracing::warn;

use super::reading::Timestamp;
use super::record::{
    Axes, ImuRecord, Location, MagnitudeRecord, NormalizedRecord, RawLocation, RawRecord,
};
use crate::source::TelemetrySnapshot;

/// Why a record was left out of the normalized sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizeWarning {
    /// The entry was not a JSON object.
    MalformedRecord { id: String },
    /// The `timestamp` field was missing or could not be parsed.
    UnparsableTimestamp { id: String },
}

/// Result of normalizing one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Records ascending by timestamp; ties keep snapshot order.
    pub records: Vec<NormalizedRecord>,
    pub warnings: Vec<NormalizeWarning>,
}

impl Normalized {
    /// The most recent record of the snapshot, if any.
    pub fn latest(&self) -> Option<&NormalizedRecord> {
        self.records.last()
    }
}

/// Normalize every entry of a snapshot.
pub fn normalize_snapshot(snapshot: TelemetrySnapshot) -> Normalized {
    let mut normalized = Normalized::default();

    for (id, value) in snapshot {
        let raw = match RawRecord::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(record = %id, error = %e, "dropping malformed record");
                normalized.warnings.push(NormalizeWarning::MalformedRecord { id });
                continue;
            }
        };

        let Some(timestamp) = raw.timestamp().and_then(Timestamp::parse) else {
            warn!(record = %id, "dropping record with unparsable timestamp");
            normalized.warnings.push(NormalizeWarning::UnparsableTimestamp { id });
            continue;
        };

        let record = match raw {
            RawRecord::Imu(r) => normalize_imu(id, timestamp, r),
            RawRecord::Magnitude(r) => normalize_magnitude(id, timestamp, r),
        };
        normalized.records.push(record);
    }

    // `sort_by_key` is stable, so equal timestamps keep snapshot order.
    normalized.records.sort_by_key(|r| r.timestamp);
    normalized
}

fn normalize_imu(id: String, timestamp: Timestamp, raw: ImuRecord) -> NormalizedRecord {
    let imu = raw.imu.unwrap_or_default();
    let acceleration = Axes {
        x: imu.ax,
        y: imu.ay,
        z: imu.az,
    };
    let gyroscope = Axes {
        x: imu.gx,
        y: imu.gy,
        z: imu.gz,
    };

    NormalizedRecord {
        id,
        timestamp,
        heart_rate: raw.heart_rate,
        temperature: raw.temperature,
        acceleration: Some(acceleration),
        gyroscope: Some(gyroscope),
        acceleration_magnitude: acceleration.magnitude(),
        gyroscope_magnitude: gyroscope.magnitude(),
        location: raw.location.map(location),
        emergency: raw.emergency.unwrap_or(false),
        fall_detected: raw.fall_detected,
    }
}

fn normalize_magnitude(id: String, timestamp: Timestamp, raw: MagnitudeRecord) -> NormalizedRecord {
    NormalizedRecord {
        id,
        timestamp,
        heart_rate: raw.heart_rate,
        temperature: raw.temperature,
        acceleration: None,
        gyroscope: None,
        acceleration_magnitude: raw.acceleration,
        gyroscope_magnitude: raw.gyroscope,
        location: raw.location.map(location),
        emergency: raw.emergency.unwrap_or(false),
        fall_detected: raw.fall_detected,
    }
}

fn location(raw: RawLocation) -> Location {
    Location {
        lat: raw.lat,
        lng: raw.lng,
    }
}
