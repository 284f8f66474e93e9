//! External delayed-event scheduler and notification collaborators.
//!
//! The engine never owns a timer. It asks a [`WakeUpScheduler`] to fire an
//! event tagged with a fingerprint after a delay, and the embedding layer
//! routes fired events back into `RecommenderEngine::on_wake_up`. Wake-up
//! ids are `feedback-<fingerprint>` so an embedder with a single alarm
//! channel can route them; [`parse_wake_up_id`] recovers the fingerprint.

use async_trait::async_trait;

use crate::error::Result;

/// Prefix for wake-up event ids.
pub const WAKE_UP_PREFIX: &str = "feedback-";

/// Wake-up event id for a fingerprint.
pub fn wake_up_id(fingerprint: &str) -> String {
    format!("{WAKE_UP_PREFIX}{fingerprint}")
}

/// Extract the fingerprint from a wake-up event id, if it is one.
pub fn parse_wake_up_id(id: &str) -> Option<&str> {
    id.strip_prefix(WAKE_UP_PREFIX)
}

/// One button on a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAction {
    pub label: String,
}

impl NotifyAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// External one-shot timer primitive.
///
/// Fire-and-forget: the scheduler delivers the id back through whatever
/// channel the embedder registered at startup.
#[async_trait]
pub trait WakeUpScheduler: Send + Sync {
    async fn schedule_once(&self, id: &str, delay_minutes: u32);
}

/// External notification/prompt surface.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        id: &str,
        title: &str,
        message: &str,
        actions: &[NotifyAction],
    ) -> Result<()>;
}
