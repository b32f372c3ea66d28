use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::trace;

use crate::record::RecordId;

/// Discrete events the controller emits to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewSignal {
    /// The candidate changed; `None` when the selection was cleared.
    SelectionChanged(Option<RecordId>),
    CompareRequested,
    BackRequested,
    CloseRequested,
    CancelRequested,
}

// ================================================================================================
// Notifications
// ================================================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

/// A user-visible message, e.g. a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Destination for user-visible notifications. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl NotificationSink for async_channel::Sender<Notification> {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.try_send(notification) {
            trace!(error = %e, "Notification dropped");
        }
    }
}

/// Sink that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _notification: Notification) {}
}
