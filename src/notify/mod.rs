//! Outbound notifications
//!
//! Delivery is fire-and-forget from the core's point of view: callers log a failed
//! `create` and move on.

pub mod messages;
pub mod nats;

pub use messages::{Notification, NotificationKind, NotificationMessage};
pub use nats::NatsNotifier;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Notification collaborator
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<()>;
}

/// Writes notifications to the log only
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn create(&self, notification: Notification) -> Result<()> {
        info!(
            "Notification [{}] for {}: {} ({})",
            notification.kind.as_str(),
            notification.target_id,
            notification.message,
            notification.link
        );
        Ok(())
    }
}
