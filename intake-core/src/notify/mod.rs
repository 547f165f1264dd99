//! Outbound notifications to account request owners

mod log_notifier;
mod webhook;

pub use log_notifier::LogNotifier;
pub use webhook::WebhookNotifier;

use crate::models::{Configuration, NotifierKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

/// Why a notification is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "account_request_approved")]
    AccountRequestApproved,
    #[serde(rename = "account_request_reset")]
    AccountRequestReset,
}

/// A rendered notification addressed to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Delivers notifications (e.g. email relay, webhook).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier name for logging (e.g. "webhook").
    fn name(&self) -> &str;

    /// Deliver one notification. Failures are reported, never retried here.
    async fn notify(&self, notification: &Notification) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Build the notifier selected by the configuration
pub fn notifier_from_config(config: &Configuration) -> anyhow::Result<Arc<dyn Notifier>> {
    match config.notifier.kind {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Webhook => {
            let url = config
                .notifier
                .webhook_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("notifier.webhook_url is not configured"))?;
            Ok(Arc::new(WebhookNotifier::new(url)?))
        }
    }
}
