//! Render payload and sinks.
//!
//! Every cycle the poll loop hands a [`Dashboard`] to a [`RenderSink`]. The
//! sink is presentational only; nothing it does flows back into the loop.

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::alert::{AlertState, EventLocation};
use crate::data::{Channel, ChannelSeries, NormalizeWarning, Reading, Timestamp};

/// Emergency flag and position of the most recent record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestStatus {
    pub record_id: String,
    pub timestamp: Timestamp,
    pub emergency: bool,
    pub location: EventLocation,
}

/// Everything a render surface needs for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Number of completed cycles, starting at 1.
    pub cycle: u64,
    pub alert_state: AlertState,
    /// Status of the newest record seen so far.
    pub latest: Option<LatestStatus>,
    /// Windows of every channel, in [`Channel::ALL`] order.
    pub channels: Vec<ChannelSeries>,
    pub window_capacity: usize,
    /// Records that survived normalization in this cycle's fetch.
    pub records_in_fetch: usize,
    /// Records dropped during this cycle's normalization.
    pub cycle_warnings: Vec<NormalizeWarning>,
    /// Records dropped since startup.
    pub warnings_total: u64,
    /// Error of this cycle's fetch, if it failed.
    pub fetch_error: Option<String>,
}

impl Dashboard {
    pub fn series(&self, channel: Channel) -> Option<&ChannelSeries> {
        self.channels.iter().find(|s| s.channel == channel)
    }

    pub fn latest_reading(&self, channel: Channel) -> Reading {
        self.series(channel).map(ChannelSeries::latest).unwrap_or_default()
    }

    pub fn window_len(&self) -> usize {
        self.channels.first().map_or(0, |s| s.points.len())
    }
}

/// Receives the dashboard once per cycle.
pub trait RenderSink: Send {
    fn render(&mut self, dashboard: &Dashboard);
}

/// Publishes dashboards to a watch channel for the terminal UI.
#[derive(Debug)]
pub struct WatchSink {
    sender: watch::Sender<Option<Dashboard>>,
}

impl WatchSink {
    /// Create a sink and the receiver the UI reads from.
    pub fn create() -> (Self, watch::Receiver<Option<Dashboard>>) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, receiver)
    }
}

impl RenderSink for WatchSink {
    fn render(&mut self, dashboard: &Dashboard) {
        self.sender.send_replace(Some(dashboard.clone()));
    }
}

/// Headless sink: one log line per cycle.
#[derive(Debug, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn render(&mut self, dashboard: &Dashboard) {
        let location = dashboard
            .latest
            .as_ref()
            .map_or(EventLocation::Unknown, |s| s.location);

        info!(
            cycle = dashboard.cycle,
            state = ?dashboard.alert_state,
            heart_rate = %dashboard.latest_reading(Channel::HeartRate),
            temperature = %dashboard.latest_reading(Channel::Temperature),
            acceleration = %dashboard.latest_reading(Channel::Acceleration),
            gyroscope = %dashboard.latest_reading(Channel::Gyroscope),
            location = %location,
            window = dashboard.window_len(),
            warnings = dashboard.cycle_warnings.len(),
            "cycle"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(cycle: u64) -> Dashboard {
        Dashboard {
            cycle,
            alert_state: AlertState::Normal,
            latest: None,
            channels: vec![ChannelSeries {
                channel: Channel::HeartRate,
                points: vec![("00:00:01".to_string(), Reading::Value(72.0))],
            }],
            window_capacity: 50,
            records_in_fetch: 1,
            cycle_warnings: Vec::new(),
            warnings_total: 0,
            fetch_error: None,
        }
    }

    #[test]
    fn test_latest_reading_lookup() {
        let d = dashboard(1);
        assert_eq!(d.latest_reading(Channel::HeartRate), Reading::Value(72.0));
        assert_eq!(d.latest_reading(Channel::Gyroscope), Reading::Missing);
        assert_eq!(d.window_len(), 1);
    }

    #[test]
    fn test_watch_sink_publishes_latest() {
        let (mut sink, receiver) = WatchSink::create();
        assert!(receiver.borrow().is_none());

        sink.render(&dashboard(1));
        sink.render(&dashboard(2));
        assert_eq!(receiver.borrow().as_ref().map(|d| d.cycle), Some(2));
    }

    #[test]
    fn test_dashboard_serializes() {
        let value = serde_json::to_value(dashboard(3)).unwrap();
        assert_eq!(value["cycle"], 3);
        assert_eq!(value["alert_state"], "normal");
        assert_eq!(value["channels"][0]["channel"], "heart_rate");
        assert_eq!(value["channels"][0]["points"][0][1], 72.0);
    }
}
