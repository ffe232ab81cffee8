//! Per-channel rolling history, advanced once per poll cycle.

use std::num::NonZeroUsize;

use serde::Serialize;

use super::reading::{Reading, Timestamp};
use super::record::{Axes, NormalizedRecord};
use super::window::RollingWindow;

/// A plotted signal.
///
/// The first four are charted; the per-axis channels are drawn inside the
/// acceleration and gyroscope charts and stay missing for records that only
/// carry magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    HeartRate,
    Temperature,
    Acceleration,
    Gyroscope,
    AccelerationX,
    AccelerationY,
    AccelerationZ,
    GyroscopeX,
    GyroscopeY,
    GyroscopeZ,
}

const CHANNEL_COUNT: usize = 10;

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::HeartRate,
        Channel::Temperature,
        Channel::Acceleration,
        Channel::Gyroscope,
        Channel::AccelerationX,
        Channel::AccelerationY,
        Channel::AccelerationZ,
        Channel::GyroscopeX,
        Channel::GyroscopeY,
        Channel::GyroscopeZ,
    ];

    /// Channels with a chart of their own.
    pub const CHARTED: [Channel; 4] = [
        Channel::HeartRate,
        Channel::Temperature,
        Channel::Acceleration,
        Channel::Gyroscope,
    ];

    /// Chart title including the unit.
    pub fn title(&self) -> &'static str {
        match self {
            Channel::HeartRate => "Heart Rate (BPM)",
            Channel::Temperature => "Temperature (°C)",
            Channel::Acceleration => "Acceleration (m/s²)",
            Channel::Gyroscope => "Gyroscope (rad/s)",
            Channel::AccelerationX => "Acc X",
            Channel::AccelerationY => "Acc Y",
            Channel::AccelerationZ => "Acc Z",
            Channel::GyroscopeX => "Gyro X",
            Channel::GyroscopeY => "Gyro Y",
            Channel::GyroscopeZ => "Gyro Z",
        }
    }

    /// Legend entry inside a chart.
    pub fn legend(&self) -> &'static str {
        match self.axis_index() {
            Some(0) => "x",
            Some(1) => "y",
            Some(_) => "z",
            None => "|v|",
        }
    }

    /// Per-axis channels drawn alongside a composite channel.
    pub fn axes(&self) -> &'static [Channel] {
        match self {
            Channel::Acceleration => &[
                Channel::AccelerationX,
                Channel::AccelerationY,
                Channel::AccelerationZ,
            ],
            Channel::Gyroscope => &[Channel::GyroscopeX, Channel::GyroscopeY, Channel::GyroscopeZ],
            _ => &[],
        }
    }

    /// 0, 1 or 2 for the x, y and z channels.
    pub fn axis_index(&self) -> Option<usize> {
        match self {
            Channel::AccelerationX | Channel::GyroscopeX => Some(0),
            Channel::AccelerationY | Channel::GyroscopeY => Some(1),
            Channel::AccelerationZ | Channel::GyroscopeZ => Some(2),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn reading(self, record: &NormalizedRecord) -> Reading {
        match self {
            Channel::HeartRate => record.heart_rate,
            Channel::Temperature => record.temperature,
            Channel::Acceleration => record.acceleration_magnitude,
            Channel::Gyroscope => record.gyroscope_magnitude,
            Channel::AccelerationX => axis(record.acceleration, |a| a.x),
            Channel::AccelerationY => axis(record.acceleration, |a| a.y),
            Channel::AccelerationZ => axis(record.acceleration, |a| a.z),
            Channel::GyroscopeX => axis(record.gyroscope, |a| a.x),
            Channel::GyroscopeY => axis(record.gyroscope, |a| a.y),
            Channel::GyroscopeZ => axis(record.gyroscope, |a| a.z),
        }
    }
}

fn axis(axes: Option<Axes>, pick: fn(&Axes) -> Reading) -> Reading {
    axes.as_ref().map_or(Reading::Missing, pick)
}

/// One channel's window as `(x_label, value)` pairs, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSeries {
    pub channel: Channel,
    pub points: Vec<(String, Reading)>,
}

impl ChannelSeries {
    pub fn latest(&self) -> Reading {
        self.points.last().map(|(_, r)| *r).unwrap_or_default()
    }
}

/// Lock-step rolling windows for the timestamp and every [`Channel`].
///
/// Index `i` of every window refers to the same record; all windows always
/// have the same length.
#[derive(Debug, Clone)]
pub struct Aggregator {
    timestamps: RollingWindow<Timestamp>,
    channels: [RollingWindow<Reading>; CHANNEL_COUNT],
}

impl Aggregator {
    pub fn new(window_size: NonZeroUsize) -> Self {
        Self {
            timestamps: RollingWindow::new(window_size),
            channels: std::array::from_fn(|_| RollingWindow::new(window_size)),
        }
    }

    /// Append the latest record of a cycle to every window.
    ///
    /// Missing readings are appended as missing so the windows stay aligned.
    pub fn advance(&mut self, latest: &NormalizedRecord) {
        self.timestamps.push(latest.timestamp);
        for channel in Channel::ALL {
            self.channels[channel.index()].push(channel.reading(latest));
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.timestamps.capacity()
    }

    pub fn timestamps(&self) -> &RollingWindow<Timestamp> {
        &self.timestamps
    }

    pub fn window(&self, channel: Channel) -> &RollingWindow<Reading> {
        &self.channels[channel.index()]
    }

    /// Labelled copy of one channel's window for rendering.
    pub fn series(&self, channel: Channel) -> ChannelSeries {
        let points = self
            .timestamps
            .iter()
            .zip(self.window(channel).iter())
            .map(|(ts, reading)| (ts.label(), *reading))
            .collect();
        ChannelSeries { channel, points }
    }

    /// Labelled copies of every channel, in [`Channel::ALL`] order.
    pub fn all_series(&self) -> Vec<ChannelSeries> {
        Channel::ALL.iter().map(|&c| self.series(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: i64, heart_rate: Reading, acceleration: Reading) -> NormalizedRecord {
        NormalizedRecord {
            id: format!("r{}", ts),
            timestamp: Timestamp::from_millis(ts),
            heart_rate,
            temperature: Reading::Value(36.5),
            acceleration: None,
            gyroscope: None,
            acceleration_magnitude: acceleration,
            gyroscope_magnitude: Reading::Missing,
            location: None,
            emergency: false,
            fall_detected: None,
        }
    }

    fn aggregator(window_size: usize) -> Aggregator {
        Aggregator::new(NonZeroUsize::new(window_size).unwrap())
    }

    fn assert_aligned(agg: &Aggregator) {
        for channel in Channel::ALL {
            assert_eq!(agg.window(channel).len(), agg.timestamps().len());
            assert!(agg.window(channel).len() <= agg.capacity());
        }
    }

    #[test]
    fn advance_appends_to_every_channel() {
        let mut agg = aggregator(10);
        agg.advance(&record(1000, Reading::Value(60.0), Reading::Value(9.8)));

        assert_eq!(agg.len(), 1);
        assert_aligned(&agg);
        assert_eq!(agg.series(Channel::HeartRate).latest(), Reading::Value(60.0));
        assert_eq!(agg.series(Channel::Acceleration).latest(), Reading::Value(9.8));
        assert_eq!(agg.series(Channel::Gyroscope).latest(), Reading::Missing);
    }

    #[test]
    fn missing_values_do_not_break_alignment() {
        let mut agg = aggregator(3);
        for i in 0..7 {
            let hr = if i % 2 == 0 { Reading::Missing } else { Reading::Value(i as f64) };
            agg.advance(&record(i * 1000, hr, Reading::Missing));
            assert_aligned(&agg);
        }

        assert_eq!(agg.len(), 3);
        assert_eq!(
            agg.window(Channel::HeartRate).to_vec(),
            vec![Reading::Missing, Reading::Value(5.0), Reading::Missing]
        );
    }

    #[test]
    fn eviction_drops_oldest_across_channels() {
        let mut agg = aggregator(2);
        for i in 1..=3 {
            agg.advance(&record(i, Reading::Value(i as f64), Reading::Missing));
        }

        let stamps: Vec<i64> = agg.timestamps().iter().map(|t| t.as_millis()).collect();
        assert_eq!(stamps, vec![2, 3]);
        assert_eq!(
            agg.window(Channel::HeartRate).to_vec(),
            vec![Reading::Value(2.0), Reading::Value(3.0)]
        );
    }

    #[test]
    fn series_labels_match_timestamps() {
        let mut agg = aggregator(5);
        agg.advance(&record(3_723_000, Reading::Value(70.0), Reading::Missing));

        let series = agg.series(Channel::Temperature);
        assert_eq!(series.points, vec![("01:02:03".to_string(), Reading::Value(36.5))]);
        assert_eq!(agg.all_series().len(), Channel::ALL.len());
    }

    #[test]
    fn per_axis_channels_follow_the_record_shape() {
        let mut agg = aggregator(5);
        let mut imu = record(1, Reading::Value(70.0), Reading::Value(5.0));
        imu.acceleration = Some(Axes {
            x: Reading::Value(3.0),
            y: Reading::Value(0.0),
            z: Reading::Value(4.0),
        });
        agg.advance(&imu);
        agg.advance(&record(2, Reading::Value(71.0), Reading::Value(9.8)));
        assert_aligned(&agg);

        assert_eq!(
            agg.window(Channel::AccelerationX).to_vec(),
            vec![Reading::Value(3.0), Reading::Missing]
        );
        assert_eq!(
            agg.window(Channel::AccelerationZ).to_vec(),
            vec![Reading::Value(4.0), Reading::Missing]
        );
        assert_eq!(
            agg.window(Channel::GyroscopeX).to_vec(),
            vec![Reading::Missing, Reading::Missing]
        );
        assert_eq!(Channel::Acceleration.axes()[1], Channel::AccelerationY);
        assert_eq!(Channel::GyroscopeZ.legend(), "z");
    }
}
