//! Emergency detection and notification.
//!
//! - [`tracker`]: the Normal/Alerting state machine that turns the emergency
//!   predicate into rising-edge [`EmergencyEvent`]s
//! - [`notifier`]: the [`Notifier`] trait, the webhook and log notifiers, and
//!   fire-and-forget [`dispatch`]

pub mod notifier;
pub mod tracker;

pub use notifier::{
    dispatch, LogNotifier, Notifier, WebhookMessage, WebhookNotifier, DEFAULT_AVATAR_URL,
    DEFAULT_USERNAME,
};
pub use tracker::{AlertState, EmergencyEvent, EmergencyTracker, EventLocation};
