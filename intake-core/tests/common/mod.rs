#![allow(dead_code)]

use async_trait::async_trait;
use intake_core::access::{Role, TokenAccessGuard};
use intake_core::actions::{AccountRequestActions, EffectDispatcher};
use intake_core::models::{AccountRequest, AccountRequestStatus};
use intake_core::notify::{Notification, Notifier};
use intake_core::store::{InMemoryRecordStore, RecordStore};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const INSTRUCTOR_TOKEN: &str = "instructor-token";
pub const FRONTEND_URL: &str = "http://localhost:4200";

/// Notifier that records every notification it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Arc<RwLock<Vec<Notification>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.sent.write().await.push(notification.clone());
        Ok(())
    }
}

/// Notifier that records attempts and then fails
#[derive(Default)]
pub struct FailingNotifier {
    pub attempts: Arc<RwLock<Vec<Notification>>>,
}

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.attempts.write().await.push(notification.clone());
        Err("relay unavailable".into())
    }
}

pub fn access_tokens() -> HashMap<String, Role> {
    let mut tokens = HashMap::new();
    tokens.insert(ADMIN_TOKEN.to_string(), Role::Admin);
    tokens.insert(INSTRUCTOR_TOKEN.to_string(), Role::Instructor);
    tokens
}

/// Actions wired to a fresh store and the given notifier
pub struct Fixture {
    pub actions: Arc<AccountRequestActions>,
    pub store: Arc<InMemoryRecordStore>,
}

impl Fixture {
    pub fn new(notifier: Arc<dyn Notifier>, records: Vec<AccountRequest>) -> Self {
        let store = Arc::new(InMemoryRecordStore::with_records(records));
        let dispatcher = EffectDispatcher::new(notifier, FRONTEND_URL).unwrap();
        let actions = Arc::new(AccountRequestActions::new(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::new(TokenAccessGuard::new(access_tokens())),
            dispatcher,
        ));
        Self { actions, store }
    }

    pub async fn stored(&self, record: &AccountRequest) -> AccountRequest {
        self.store.find_by_id(record.id).await.unwrap().unwrap()
    }
}

pub fn account_request(name: &str, email: &str, status: AccountRequestStatus) -> AccountRequest {
    let mut record = AccountRequest::new(
        name.to_string(),
        email.to_string(),
        "Intake Test Institute 1".to_string(),
        Some("Some comments".to_string()),
    );
    record.status = status;
    if status == AccountRequestStatus::Registered {
        record.registered_at = Some(chrono::Utc::now());
    }
    record
}
