//! Account request actions
//!
//! Each action authorizes the caller, parses its parameters, performs all
//! checks against the stored record, persists the result and only then
//! dispatches side effects. Any error returned leaves the store untouched.

mod dispatch;
mod error;
mod lifecycle;
pub mod params;
pub mod transition;
mod update;

pub use dispatch::{DispatchReport, EffectDispatcher};
pub use error::ActionError;
pub use transition::{Effect, Plan, UpdateFields};

use crate::access::{AccessGuard, Caller, ResourceClass};
use crate::models::AccountRequest;
use crate::services::logging::log_security_event;
use crate::store::{KeyedLocks, RecordStore};
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

/// Entry point for every account request operation
pub struct AccountRequestActions {
    store: Arc<dyn RecordStore>,
    guard: Arc<dyn AccessGuard>,
    dispatcher: EffectDispatcher,
    locks: KeyedLocks,
}

impl AccountRequestActions {
    pub fn new(
        store: Arc<dyn RecordStore>,
        guard: Arc<dyn AccessGuard>,
        dispatcher: EffectDispatcher,
    ) -> Self {
        Self {
            store,
            guard,
            dispatcher,
            locks: KeyedLocks::new(),
        }
    }

    pub fn guard(&self) -> &Arc<dyn AccessGuard> {
        &self.guard
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Fail unless `caller` may act on `resource`
    pub fn authorize(
        &self,
        caller: &Caller,
        resource: ResourceClass,
        action: &str,
    ) -> Result<(), ActionError> {
        if self.guard.authorize(caller, resource) {
            return Ok(());
        }

        log_security_event("access_denied", &caller.to_string(), action);
        if caller.is_authenticated() {
            Err(ActionError::Forbidden(
                "You are not authorized to access this resource.".to_string(),
            ))
        } else {
            Err(ActionError::Unauthorized(
                "Missing or unrecognized access token.".to_string(),
            ))
        }
    }

    /// Run `op` while holding the lock for `id`
    async fn with_lock<T, F, Fut>(&self, id: Uuid, op: F) -> Result<T, ActionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ActionError>>,
    {
        let _guard = self.locks.lock(id).await;
        op().await
    }

    /// Number of ids with a live lock entry
    pub fn locked_ids(&self) -> usize {
        self.locks.tracked()
    }

    async fn load(&self, id: Uuid) -> Result<AccountRequest, ActionError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> ActionError {
    ActionError::NotFound(format!("Account request with id = {} not found", id))
}
