use super::{RecordStore, StoreError};
use crate::models::AccountRequest;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory record store backed by a concurrent map
pub struct InMemoryRecordStore {
    records: DashMap<Uuid, AccountRequest>,
    // Serialises the duplicate check and insert of new records
    insert_lock: Mutex<()>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            insert_lock: Mutex::new(()),
        }
    }

    /// Build a store pre-populated with the given records
    pub fn with_records(records: impl IntoIterator<Item = AccountRequest>) -> Self {
        let store = Self::new();
        for record in records {
            store.records.insert(record.id, record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find_where(&self, predicate: impl Fn(&AccountRequest) -> bool) -> Option<AccountRequest> {
        self.records
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRequest>, StoreError> {
        Ok(self.records.get(&id).map(|r| r.clone()))
    }

    async fn save(&self, record: AccountRequest) -> Result<(), StoreError> {
        self.records.insert(record.id, record);
        Ok(())
    }

    async fn insert(&self, record: AccountRequest) -> Result<AccountRequest, StoreError> {
        let _guard = self
            .insert_lock
            .lock()
            .map_err(|_| StoreError::Backend("insert lock poisoned".to_string()))?;

        if self.records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }

        if self
            .find_where(|r| r.email == record.email && r.institute == record.institute)
            .is_some()
        {
            return Err(StoreError::DuplicateRequest {
                email: record.email.clone(),
                institute: record.institute.clone(),
            });
        }

        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AccountRequest>, StoreError> {
        Ok(self.records.remove(&id).map(|(_, record)| record))
    }

    async fn list(&self) -> Result<Vec<AccountRequest>, StoreError> {
        let mut records: Vec<AccountRequest> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }

    async fn find_by_registration_key(
        &self,
        registration_key: &str,
    ) -> Result<Option<AccountRequest>, StoreError> {
        Ok(self.find_where(|r| r.registration_key == registration_key))
    }

    async fn find_by_email_and_institute(
        &self,
        email: &str,
        institute: &str,
    ) -> Result<Option<AccountRequest>, StoreError> {
        Ok(self.find_where(|r| r.email == email && r.institute == institute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountRequestStatus;

    fn request(name: &str, email: &str, institute: &str) -> AccountRequest {
        AccountRequest::new(
            name.to_string(),
            email.to_string(),
            institute.to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryRecordStore::new();
        let created = store
            .insert(request("Jane", "jane@uni.edu", "Uni"))
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));

        let by_key = store
            .find_by_registration_key(&created.registration_key)
            .await
            .unwrap();
        assert_eq!(by_key.map(|r| r.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_duplicate_email_and_institute_rejected() {
        let store = InMemoryRecordStore::new();
        store
            .insert(request("Jane", "jane@uni.edu", "Uni"))
            .await
            .unwrap();

        let result = store.insert(request("Janet", "jane@uni.edu", "Uni")).await;
        assert!(matches!(result, Err(StoreError::DuplicateRequest { .. })));

        // Same email at a different institute is a separate request
        assert!(store
            .insert(request("Jane", "jane@uni.edu", "Other Uni"))
            .await
            .is_ok());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = InMemoryRecordStore::new();
        let mut created = store
            .insert(request("Jane", "jane@uni.edu", "Uni"))
            .await
            .unwrap();

        created.status = AccountRequestStatus::Approved;
        created.name = "Jane Doe".to_string();
        store.save(created.clone()).await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.status, AccountRequestStatus::Approved);
        assert_eq!(found.name, "Jane Doe");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let first = request("First", "first@uni.edu", "Uni");
        let mut second = request("Second", "second@uni.edu", "Uni");
        second.created_at = first.created_at + chrono::Duration::seconds(1);
        let store = InMemoryRecordStore::with_records(vec![second.clone(), first.clone()]);

        let listed = store.list().await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        let removed = store.delete(first.id).await.unwrap();
        assert_eq!(removed.map(|r| r.id), Some(first.id));
        assert!(store.delete(first.id).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
