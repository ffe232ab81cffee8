//! Outbound emergency notifications.
//!
//! A notifier gets exactly one attempt per rising edge. Delivery is
//! fire-and-forget from the poll loop's point of view: [`dispatch`] spawns
//! the attempt and only logs its outcome.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use super::tracker::EmergencyEvent;
use crate::error::NotifyError;

/// Default display name of the webhook bot.
pub const DEFAULT_USERNAME: &str = "LifeAlertBot";
/// Default avatar of the webhook bot.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn-icons-png.flaticon.com/512/564/564619.png";
/// Embed colour (red).
const ALERT_COLOR: u32 = 16711680;

/// Delivers an [`EmergencyEvent`] somewhere outside the process.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Make a single delivery attempt.
    async fn notify(&self, event: &EmergencyEvent) -> Result<(), NotifyError>;

    /// Human-readable target, for logs.
    fn description(&self) -> &str;
}

/// Spawn one notification attempt and log its result.
///
/// Must be called from within a tokio runtime.
pub fn dispatch(notifier: Arc<dyn Notifier>, event: EmergencyEvent) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.notify(&event).await {
            Ok(()) => info!(
                notifier = notifier.description(),
                record = %event.record_id,
                "emergency alert sent"
            ),
            Err(e) => error!(
                notifier = notifier.description(),
                record = %event.record_id,
                error = %e,
                "failed to send emergency alert"
            ),
        }
    })
}

/// Discord-compatible webhook message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

impl WebhookMessage {
    pub fn for_event(event: &EmergencyEvent, username: &str, avatar_url: &str) -> Self {
        let description = format!(
            "💓 **Heart Rate:** {} bpm\n🌡 **Temperature:** {}°C\n📍 **Location:** {}",
            event.heart_rate, event.temperature, event.location
        );
        Self {
            username: username.to_string(),
            avatar_url: avatar_url.to_string(),
            embeds: vec![Embed {
                title: "🚨 **Emergency Alert!**".to_string(),
                description,
                color: ALERT_COLOR,
            }],
        }
    }
}

/// Posts alerts to a chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    username: String,
    avatar_url: String,
    description: String,
}

impl WebhookNotifier {
    pub fn builder() -> WebhookNotifierBuilder {
        WebhookNotifierBuilder::default()
    }

    pub fn message(&self, event: &EmergencyEvent) -> WebhookMessage {
        WebhookMessage::for_event(event, &self.username, &self.avatar_url)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &EmergencyEvent) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(&self.message(event)).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(status.as_u16()))
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`WebhookNotifier`].
#[derive(Debug, Default)]
pub struct WebhookNotifierBuilder {
    url: Option<String>,
    username: Option<String>,
    avatar_url: Option<String>,
    timeout: Option<Duration>,
}

impl WebhookNotifierBuilder {
    /// Set the webhook URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the bot display name (default: "LifeAlertBot").
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the bot avatar URL.
    pub fn avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<WebhookNotifier, NotifyError> {
        let url = self.url.filter(|u| !u.trim().is_empty()).ok_or(NotifyError::MissingUrl)?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(WebhookNotifier {
            client,
            description: format!("webhook: {}", redact(&url)),
            url,
            username: self.username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            avatar_url: self.avatar_url.unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        })
    }
}

// Webhook URLs embed their secret token in the path.
fn redact(url: &str) -> String {
    match url.find("://").map(|i| i + 3) {
        Some(start) => {
            let host_end = url[start..].find('/').map_or(url.len(), |i| start + i);
            format!("{}/…", &url[..host_end])
        }
        None => "…".to_string(),
    }
}

/// Logs alerts instead of delivering them. Used when no webhook is set.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &EmergencyEvent) -> Result<(), NotifyError> {
        warn!(
            record = %event.record_id,
            heart_rate = %event.heart_rate,
            temperature = %event.temperature,
            location = %event.location,
            "EMERGENCY (no webhook configured)"
        );
        Ok(())
    }

    fn description(&self) -> &str {
        "log"
    }
}
