//! Webhook notifier: POSTs each notification as JSON to a relay endpoint.

use super::{Notification, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct WebhookNotifier {
    url: url::Url,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let url = url::Url::parse(url)
            .map_err(|e| anyhow::anyhow!("Invalid webhook URL {}: {}", url, e))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), Box<dyn Error + Send + Sync>> {
        let res = self
            .client
            .post(self.url.clone())
            .json(notification)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let err_body = res.text().await.unwrap_or_default();
            return Err(format!("Webhook error {}: {}", status, err_body).into());
        }
        Ok(())
    }
}
