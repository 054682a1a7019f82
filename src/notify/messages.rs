use serde::{Deserialize, Serialize};

/// Kind of notification emitted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Post-call analysis has been stored
    ResultsReady,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ResultsReady => "results_ready",
        }
    }
}

/// A notification for one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub target_id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub link: String,
}

/// Notification message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub link: String,
    pub timestamp: String, // RFC3339 timestamp
}

impl NotificationMessage {
    pub fn new(notification: Notification, timestamp: String) -> Self {
        Self {
            target_id: notification.target_id,
            kind: notification.kind,
            message: notification.message,
            link: notification.link,
            timestamp,
        }
    }
}
