//! Runtime settings.
//!
//! Loaded with the `config` crate from an optional TOML file and
//! `VITALWATCH_*` environment variables, nested keys separated by `__`
//! (`VITALWATCH_STORE__URL`). Command-line flags are applied on top by the
//! binary before [`Settings::validate`] runs.
//!
//! ```toml
//! poll_interval_seconds = 1.0
//! window_size = 50
//! use_fall_detect = true
//!
//! [store]
//! url = "https://example-default-rtdb.firebaseio.com"
//! path = "sensorData"
//!
//! [webhook]
//! url = "https://discord.com/api/webhooks/..."
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::alert::{LogNotifier, Notifier, WebhookNotifier, DEFAULT_AVATAR_URL, DEFAULT_USERNAME};
use crate::data::DEFAULT_WINDOW_SIZE;
use crate::error::{ConfigError, NotifyError, SourceError};
use crate::source::{DataSource, FileSource, HttpSource, DEFAULT_PATH};

const ENV_PREFIX: &str = "VITALWATCH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: f64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_true")]
    pub use_fall_detect: bool,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
}

/// Where snapshots come from. `file` takes precedence over `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub auth: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

/// Webhook target. Without a URL alerts are only logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,
}

fn default_poll_interval() -> f64 {
    1.0
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_true() -> bool {
    true
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_timeout() -> f64 {
    10.0
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_avatar_url() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            window_size: default_window_size(),
            use_fall_detect: true,
            store: StoreSettings::default(),
            webhook: WebhookSettings::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            path: default_path(),
            auth: None,
            file: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            url: None,
            username: default_username(),
            avatar_url: default_avatar_url(),
        }
    }
}

/// The environment layer used by [`Settings::load`].
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, environment())
    }

    /// Load from an optional file plus the given environment layer.
    pub fn load_from(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Check the startup invariants; any failure is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindowSize);
        }
        if !is_positive(self.poll_interval_seconds) {
            return Err(ConfigError::InvalidPollInterval(self.poll_interval_seconds));
        }
        if !is_positive(self.store.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.store.timeout_seconds));
        }
        if self.store.url.is_none() && self.store.file.is_none() {
            return Err(ConfigError::MissingStore);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_seconds)
    }

    /// Build the configured snapshot source.
    pub fn build_source(&self) -> Result<Box<dyn DataSource>, SourceError> {
        if let Some(ref file) = self.store.file {
            return Ok(Box::new(FileSource::new(file)));
        }

        let mut builder = HttpSource::builder()
            .path(self.store.path.clone())
            .timeout(Duration::from_secs_f64(self.store.timeout_seconds));
        if let Some(ref url) = self.store.url {
            builder = builder.base_url(url.clone());
        }
        if let Some(ref auth) = self.store.auth {
            builder = builder.auth(auth.clone());
        }
        Ok(Box::new(builder.build()?))
    }

    /// Build the webhook notifier, or a log-only one when no URL is set.
    pub fn build_notifier(&self) -> Result<Arc<dyn Notifier>, NotifyError> {
        match self.webhook.url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                let notifier = WebhookNotifier::builder()
                    .url(url.to_string())
                    .username(self.webhook.username.clone())
                    .avatar_url(self.webhook.avatar_url.clone())
                    .timeout(Duration::from_secs_f64(self.store.timeout_seconds))
                    .build()?;
                Ok(Arc::new(notifier))
            }
            None => Ok(Arc::new(LogNotifier)),
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
