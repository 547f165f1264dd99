//! Account request storage

mod locks;
mod memory;

pub use locks::{KeyedLockGuard, KeyedLocks};
pub use memory::InMemoryRecordStore;

use crate::models::AccountRequest;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Account request with id = {0} already exists")]
    AlreadyExists(Uuid),

    #[error("An account request for {email} at {institute} already exists")]
    DuplicateRequest { email: String, institute: String },

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Durable storage of account requests keyed by id.
///
/// Implementations must be strongly consistent for a single id: a `save`
/// is visible to every later `find_by_id`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRequest>, StoreError>;

    /// Overwrite the stored record with the same id
    async fn save(&self, record: AccountRequest) -> Result<(), StoreError>;

    /// Store a new record; the (email, institute) pair must be unused
    async fn insert(&self, record: AccountRequest) -> Result<AccountRequest, StoreError>;

    /// Remove a record, returning it if it existed
    async fn delete(&self, id: Uuid) -> Result<Option<AccountRequest>, StoreError>;

    /// All records ordered by creation time
    async fn list(&self) -> Result<Vec<AccountRequest>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    async fn find_by_registration_key(
        &self,
        registration_key: &str,
    ) -> Result<Option<AccountRequest>, StoreError>;

    async fn find_by_email_and_institute(
        &self,
        email: &str,
        institute: &str,
    ) -> Result<Option<AccountRequest>, StoreError>;
}
