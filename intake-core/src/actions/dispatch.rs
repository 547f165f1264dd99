//! Post-commit effect dispatch

use super::transition::Effect;
use crate::notify::{Notification, NotificationKind, Notifier};
use std::sync::Arc;
use url::Url;

/// Outcome of dispatching a batch of effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Turns effects into notifications and hands each to the notifier exactly once.
///
/// Delivery failures are logged and counted; they never undo the committed
/// change that produced the effect.
pub struct EffectDispatcher {
    notifier: Arc<dyn Notifier>,
    join_url: Url,
}

impl EffectDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, frontend_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(frontend_url)
            .map_err(|e| anyhow::anyhow!("Invalid frontend URL {}: {}", frontend_url, e))?;
        let join_url = base.join("/web/join")?;
        Ok(Self { notifier, join_url })
    }

    /// Link a requester follows to join with their registration key
    pub fn join_link(&self, registration_key: &str) -> String {
        let mut url = self.join_url.clone();
        url.query_pairs_mut()
            .append_pair("iid", registration_key)
            .append_pair("isinstructor", "true");
        url.to_string()
    }

    pub fn render(&self, effect: &Effect) -> Notification {
        match effect {
            Effect::NotifyApproval {
                recipient,
                name,
                registration_key,
            } => Notification {
                kind: NotificationKind::AccountRequestApproved,
                recipient: recipient.clone(),
                subject: "Intake: Your account request has been approved".to_string(),
                body: format!(
                    "Hello {},\n\nYour request for an instructor account has been approved.\n\
                     Use the link below to join:\n{}\n",
                    name,
                    self.join_link(registration_key)
                ),
            },
            Effect::NotifyReset {
                recipient,
                name,
                registration_key,
            } => Notification {
                kind: NotificationKind::AccountRequestReset,
                recipient: recipient.clone(),
                subject: "Intake: Your account registration has been reset".to_string(),
                body: format!(
                    "Hello {},\n\nYour instructor account registration has been reset.\n\
                     Use the link below to join again:\n{}\n",
                    name,
                    self.join_link(registration_key)
                ),
            },
        }
    }

    pub async fn dispatch(&self, effects: &[Effect]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for effect in effects {
            let notification = self.render(effect);
            match self.notifier.notify(&notification).await {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!(
                        notifier = self.notifier.name(),
                        recipient = %notification.recipient,
                        "Notification delivered"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        notifier = self.notifier.name(),
                        recipient = %notification.recipient,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }
        report
    }
}
