//! Telemetry data models and processing.
//!
//! ## Submodules
//!
//! - [`reading`]: [`Reading`] (present-or-missing value) and [`Timestamp`]
//! - [`record`]: raw schema variants and the [`NormalizedRecord`]
//! - [`normalize`]: snapshot → ordered records, with warnings
//! - [`window`]: the fixed-capacity [`RollingWindow`]
//! - [`aggregate`]: lock-step per-channel windows ([`Aggregator`])
//!
//! ## Data Flow
//!
//! ```text
//! TelemetrySnapshot (raw JSON map)
//!        │
//!        ▼
//! normalize_snapshot()  ──▶ NormalizeWarning (dropped records)
//!        │
//!        ▼
//! Vec<NormalizedRecord> (ascending timestamp)
//!        │ latest only
//!        ▼
//! Aggregator::advance() ──▶ ChannelSeries (for rendering)
//! ```

pub mod aggregate;
pub mod normalize;
pub mod reading;
pub mod record;
pub mod window;

pub use aggregate::{Aggregator, Channel, ChannelSeries};
pub use normalize::{normalize_snapshot, NormalizeWarning, Normalized};
pub use reading::{Reading, Timestamp};
pub use record::{Axes, Location, NormalizedRecord, RawRecord};
pub use window::{RollingWindow, DEFAULT_WINDOW_SIZE};
