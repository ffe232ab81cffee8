//! Channel-based data source.
//!
//! Serves the latest snapshot pushed through a tokio watch channel. Useful
//! when another task already talks to the store, and for driving the poll
//! loop in tests.

use async_trait::async_trait;
use tokio::sync::watch;

use super::{DataSource, TelemetrySnapshot};
use crate::error::SourceError;

/// A data source backed by a watch channel.
///
/// Each fetch returns the value currently in the channel, mirroring a
/// full-snapshot pull from a store.
///
/// # Example
///
/// ```
/// use vitalwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("bridge");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TelemetrySnapshot>,
    description: String,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<TelemetrySnapshot>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair, starting from an empty snapshot.
    pub fn create(source_description: &str) -> (watch::Sender<TelemetrySnapshot>, Self) {
        let (tx, rx) = watch::channel(TelemetrySnapshot::new());
        (tx, Self::new(rx, source_description))
    }
}

#[async_trait]
impl DataSource for ChannelSource {
    async fn fetch(&mut self) -> Result<TelemetrySnapshot, SourceError> {
        if self.receiver.has_changed().is_err() {
            return Err(SourceError::Closed);
        }
        Ok(self.receiver.borrow_and_update().clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
