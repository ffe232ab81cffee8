//! Data source abstraction for fetching telemetry snapshots.
//!
//! Every fetch is a full-snapshot pull. A failed fetch is reported as an
//! error; the poll loop logs it and carries on as if nothing arrived.

mod channel;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::{HttpSource, HttpSourceBuilder, DEFAULT_PATH};
pub use snapshot::{snapshot_from_value, TelemetrySnapshot};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::SourceError;

/// Trait for fetching telemetry snapshots from a store.
///
/// # Example
///
/// ```
/// use vitalwatch::{DataSource, FileSource};
///
/// # tokio_test::block_on(async {
/// let mut source = FileSource::new("telemetry.json");
/// match source.fetch().await {
///     Ok(snapshot) => println!("Got {} records", snapshot.len()),
///     Err(e) => println!("Fetch failed: {}", e),
/// }
/// # });
/// ```
#[async_trait]
pub trait DataSource: Send + Debug {
    /// Fetch the current snapshot.
    async fn fetch(&mut self) -> Result<TelemetrySnapshot, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used in logs and the TUI status bar.
    fn description(&self) -> &str;
}
