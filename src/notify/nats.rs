use super::messages::{Notification, NotificationMessage};
use super::Notifier;
use anyhow::{Context, Result};
use async_nats::Client;
use async_trait::async_trait;
use tracing::info;

/// Publishes notifications as JSON on `<prefix>.<kind>`
pub struct NatsNotifier {
    client: Client,
    subject_prefix: String,
}

impl NatsNotifier {
    /// Connect to NATS server
    pub async fn connect(url: &str, subject_prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject_prefix: subject_prefix.into(),
        })
    }

    pub fn subject_for(&self, notification: &Notification) -> String {
        format!("{}.{}", self.subject_prefix, notification.kind.as_str())
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn create(&self, notification: Notification) -> Result<()> {
        let subject = self.subject_for(&notification);
        let target_id = notification.target_id.clone();

        let message = NotificationMessage::new(notification, chrono::Utc::now().to_rfc3339());
        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish notification")?;

        info!("Published notification to {} (target={})", subject, target_id);

        Ok(())
    }
}
