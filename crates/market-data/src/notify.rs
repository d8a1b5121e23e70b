//! User-facing notifications emitted by the adapters.
//!
//! Adapters report failures and advisories through this side channel instead
//! of returning errors. A UI subscribes and renders them as transient toasts.

use serde::Serialize;
use tokio::sync::broadcast;

/// Default number of buffered notifications per subscriber.
const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }
}

/// Broadcast bus that fans notifications out to any listening views.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn publish(&self, notification: Notification) {
        // No listeners or lagging listeners are fine; producers never block.
        let _ = self.sender.send(notification);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Notification::error(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.publish(Notification::warning(message));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
