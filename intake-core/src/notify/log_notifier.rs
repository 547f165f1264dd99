use super::{Notification, Notifier};
use async_trait::async_trait;
use std::error::Error;

/// Notifier that only records notifications in the log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::info!(
            kind = ?notification.kind,
            recipient = %notification.recipient,
            subject = %notification.subject,
            "Notification issued"
        );
        Ok(())
    }
}
