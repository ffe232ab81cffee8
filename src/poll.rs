//! The poll loop.
//!
//! [`MonitorState`] holds every piece of state that survives between
//! cycles and advances it with the I/O-free [`MonitorState::step`].
//! [`PollLoop`] wires a state to a source, a notifier and a render sink and
//! drives it from a fixed-period ticker.
//!
//! ```text
//!  tick ─▶ fetch ─▶ normalize ─▶ aggregate ─▶ evaluate ─┬─▶ render
//!                                                       └─▶ dispatch (edge only)
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::alert::{dispatch, AlertState, EmergencyEvent, EmergencyTracker, EventLocation, Notifier};
use crate::data::{normalize_snapshot, Aggregator, Normalized};
use crate::error::{ConfigError, SourceError};
use crate::render::{Dashboard, LatestStatus, RenderSink};
use crate::source::{DataSource, TelemetrySnapshot};

/// Result of one cycle.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub dashboard: Dashboard,
    /// Set only on the cycle where the emergency predicate rose.
    pub alert: Option<EmergencyEvent>,
}

/// State carried across poll cycles.
#[derive(Debug, Clone)]
pub struct MonitorState {
    aggregator: Aggregator,
    tracker: EmergencyTracker,
    latest: Option<LatestStatus>,
    cycle: u64,
    warnings_total: u64,
}

impl MonitorState {
    /// Fails when `window_size` is zero.
    pub fn new(window_size: usize, use_fall_detect: bool) -> Result<Self, ConfigError> {
        let window_size = NonZeroUsize::new(window_size).ok_or(ConfigError::InvalidWindowSize)?;
        Ok(Self {
            aggregator: Aggregator::new(window_size),
            tracker: EmergencyTracker::new(use_fall_detect),
            latest: None,
            cycle: 0,
            warnings_total: 0,
        })
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn alert_state(&self) -> AlertState {
        self.tracker.state()
    }

    pub fn warnings_total(&self) -> u64 {
        self.warnings_total
    }

    /// Advance by one cycle.
    ///
    /// A failed fetch counts as an empty snapshot. When no record survives
    /// normalization the windows and the alert state are left untouched.
    pub fn step(&mut self, fetched: Result<TelemetrySnapshot, SourceError>) -> CycleOutput {
        self.cycle += 1;

        let (normalized, fetch_error) = match fetched {
            Ok(snapshot) => (normalize_snapshot(snapshot), None),
            Err(e) => (Normalized::default(), Some(e.to_string())),
        };
        self.warnings_total += normalized.warnings.len() as u64;

        let mut alert = None;
        if let Some(latest) = normalized.latest() {
            self.aggregator.advance(latest);
            alert = self.tracker.evaluate(latest);
            self.latest = Some(LatestStatus {
                record_id: latest.id.clone(),
                timestamp: latest.timestamp,
                emergency: self.tracker.predicate(latest),
                location: EventLocation::from_record(latest.location.as_ref()),
            });
        }

        let dashboard = Dashboard {
            cycle: self.cycle,
            alert_state: self.tracker.state(),
            latest: self.latest.clone(),
            channels: self.aggregator.all_series(),
            window_capacity: self.aggregator.capacity(),
            records_in_fetch: normalized.records.len(),
            cycle_warnings: normalized.warnings,
            warnings_total: self.warnings_total,
            fetch_error,
        };

        CycleOutput { dashboard, alert }
    }
}

/// Drives a [`MonitorState`] at a fixed cadence.
pub struct PollLoop {
    state: MonitorState,
    source: Box<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    sink: Box<dyn RenderSink>,
    interval: Duration,
}

impl PollLoop {
    pub fn new(
        state: MonitorState,
        source: Box<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
        sink: Box<dyn RenderSink>,
        interval: Duration,
    ) -> Self {
        Self {
            state,
            source,
            notifier,
            sink,
            interval,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Run a single fetch → render cycle.
    ///
    /// Returns the handle of the spawned notification when this cycle
    /// raised an alert. The loop itself never waits on it.
    pub async fn run_cycle(&mut self) -> Option<JoinHandle<()>> {
        let fetched = self.source.fetch().await;
        if let Err(ref e) = fetched {
            warn!(source = self.source.description(), error = %e, "fetch failed, skipping cycle");
        }

        let output = self.state.step(fetched);
        debug!(
            cycle = output.dashboard.cycle,
            records = output.dashboard.records_in_fetch,
            "cycle complete"
        );

        let handle = output.alert.map(|event| {
            info!(record = %event.record_id, location = %event.location, "emergency detected");
            dispatch(Arc::clone(&self.notifier), event)
        });

        self.sink.render(&output.dashboard);
        handle
    }

    /// Poll forever. The first cycle runs immediately.
    pub async fn run(mut self) {
        info!(
            source = self.source.description(),
            notifier = self.notifier.description(),
            interval_ms = self.interval.as_millis() as u64,
            "starting poll loop"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }
}
