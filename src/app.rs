//! Terminal UI state.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::watch;

use crate::render::Dashboard;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
///
/// The poll loop runs elsewhere and publishes dashboards through a watch
/// channel; the app only reads the newest one.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    receiver: watch::Receiver<Option<Dashboard>>,
    source_description: String,
    pub dashboard: Option<Dashboard>,
    pub last_update: Option<Instant>,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(receiver: watch::Receiver<Option<Dashboard>>, source_description: &str) -> Self {
        Self {
            running: true,
            show_help: false,
            receiver,
            source_description: source_description.to_string(),
            dashboard: None,
            last_update: None,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Take the newest dashboard if one was published since the last call.
    ///
    /// Returns `true` when the view changed.
    pub fn refresh(&mut self) -> bool {
        match self.receiver.has_changed() {
            Ok(true) => {
                let latest = self.receiver.borrow_and_update().clone();
                if latest.is_some() {
                    self.dashboard = latest;
                    self.last_update = Some(Instant::now());
                }
                true
            }
            Ok(false) => false,
            Err(_) => {
                if self.running {
                    self.set_status_message("Poll loop stopped".to_string());
                }
                false
            }
        }
    }

    pub fn seconds_since_update(&self) -> Option<u64> {
        self.last_update.map(|t| t.elapsed().as_secs())
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the current dashboard to `path` as pretty JSON.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref dashboard) = self.dashboard else {
            anyhow::bail!("No data to export");
        };
        export_dashboard(dashboard, path)
    }
}

/// Write a dashboard to `path` as pretty JSON.
pub fn export_dashboard(dashboard: &Dashboard, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(dashboard)?;
    std::fs::write(path, json)?;
    Ok(())
}
