//! # vitalwatch
//!
//! A monitor for wearable telemetry. It polls a store that keeps a snapshot
//! of device records, plots heart rate, temperature, acceleration and
//! gyroscope over a rolling window, and raises a webhook alert once each
//! time the wearer's emergency flag goes up.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            PollLoop                              │
//! │  ┌─────────┐   ┌──────────┐   ┌──────────────────┐   ┌─────────┐ │
//! │  │ source  │──▶│   data   │──▶│     alert        │──▶│ render  │ │
//! │  │ (fetch) │   │(normalize│   │ (tracker → edge) │   │ (sink)  │ │
//! │  └─────────┘   │ + windows)   └────────┬─────────┘   └────┬────┘ │
//! │                └──────────┘            ▼                  ▼      │
//! │                                  Notifier (spawned)   TUI / log  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`DataSource`] trait with HTTP, file and channel
//!   implementations
//! - **[`data`]**: record normalization and the per-channel rolling windows
//! - **[`alert`]**: the Normal/Alerting state machine and the notifiers
//! - **[`poll`]**: [`MonitorState`], its I/O-free step, and the [`PollLoop`]
//!   driver
//! - **[`render`]**: the per-cycle [`Dashboard`] and render sinks
//! - **[`config`]**: layered [`Settings`]
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the terminal UI
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a realtime database node and alert a webhook
//! vitalwatch --url https://my-db.firebaseio.com --webhook https://discord.com/api/webhooks/...
//!
//! # Replay a local snapshot without a terminal UI
//! vitalwatch --file snapshot.json --headless
//! ```
//!
//! ### Stepping the monitor directly
//!
//! ```
//! use serde_json::json;
//! use vitalwatch::{AlertState, MonitorState};
//!
//! let mut state = MonitorState::new(50, true).unwrap();
//! let snapshot = json!({ "-N1": { "timestamp": 1000, "emergency": true } });
//! let snapshot = vitalwatch::source::snapshot_from_value(snapshot).unwrap();
//!
//! let output = state.step(Ok(snapshot.clone()));
//! assert!(output.alert.is_some());
//! assert_eq!(state.alert_state(), AlertState::Alerting);
//!
//! // Still in an emergency: no second alert.
//! assert!(state.step(Ok(snapshot)).alert.is_none());
//! ```
//!
//! ### Driving the loop from a channel
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vitalwatch::{ChannelSource, LogNotifier, LogSink, MonitorState, PollLoop};
//!
//! # tokio_test::block_on(async {
//! let (tx, source) = ChannelSource::create("bridge");
//! let mut poll = PollLoop::new(
//!     MonitorState::new(50, true).unwrap(),
//!     Box::new(source),
//!     Arc::new(LogNotifier),
//!     Box::new(LogSink),
//!     Duration::from_secs(1),
//! );
//! poll.run_cycle().await;
//! # drop(tx);
//! # });
//! ```

pub mod alert;
pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod poll;
pub mod render;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use alert::{AlertState, EmergencyEvent, EmergencyTracker, LogNotifier, Notifier, WebhookNotifier};
pub use app::App;
pub use config::Settings;
pub use data::{Aggregator, Channel, NormalizedRecord, Reading, Timestamp};
pub use error::{ConfigError, NotifyError, SourceError};
pub use poll::{CycleOutput, MonitorState, PollLoop};
pub use render::{Dashboard, LogSink, RenderSink, WatchSink};
pub use source::{ChannelSource, DataSource, FileSource, HttpSource, TelemetrySnapshot};
