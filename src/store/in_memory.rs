//! In-memory grant backend.
//!
//! A concurrent map keyed by (subject, scope). This is the reference
//! backend: tests run against it, and it doubles as a store for
//! processes that do not need durability.

use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;

use super::{GrantBackend, PermissionRecord};

/// An in-memory grant backend.
///
/// Upserts replace the whole record atomically per key, so a cancelled
/// call never leaves a half-written level.
#[derive(Clone)]
pub struct InMemoryGrantStore<R: PermissionRecord>
where
    R::SubjectId: Eq + Hash,
{
    records: Arc<DashMap<(R::SubjectId, String), R>>,
}

impl<R: PermissionRecord> InMemoryGrantStore<R>
where
    R::SubjectId: Eq + Hash,
{
    /// Create an empty in-memory grant backend.
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Number of grants currently stored, across all subjects.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: PermissionRecord> Default for InMemoryGrantStore<R>
where
    R::SubjectId: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> GrantBackend<R> for InMemoryGrantStore<R>
where
    R: PermissionRecord + Clone,
    R::SubjectId: Eq + Hash,
{
    async fn fetch(&self, subject: &R::SubjectId, scope: &str) -> Result<Option<R>, StoreError> {
        let key = (subject.clone(), scope.to_string());
        Ok(self.records.get(&key).map(|r| r.value().clone()))
    }

    async fn fetch_all(&self, subject: &R::SubjectId) -> Result<Vec<R>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| &entry.key().0 == subject)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn upsert(&self, record: R) -> Result<R, StoreError> {
        let key = (record.subject_id().clone(), record.scope_name().to_string());
        self.records.insert(key, record.clone());
        Ok(record)
    }

    async fn delete(&self, subject: &R::SubjectId, scope: &str) -> Result<bool, StoreError> {
        let key = (subject.clone(), scope.to_string());
        Ok(self.records.remove(&key).is_some())
    }

    async fn delete_all(&self, subject: &R::SubjectId) -> Result<u64, StoreError> {
        let keys: Vec<_> = self
            .records
            .iter()
            .filter(|entry| &entry.key().0 == subject)
            .map(|entry| entry.key().clone())
            .collect();
        let mut count = 0;
        for key in keys {
            if self.records.remove(&key).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Grant;

    #[tokio::test]
    async fn test_upsert_and_fetch() {
        let store: InMemoryGrantStore<Grant<u64>> = InMemoryGrantStore::new();

        store
            .upsert(Grant::new(1, "tasks".to_string(), 3))
            .await
            .unwrap();

        let fetched = store.fetch(&1, "tasks").await.unwrap().unwrap();
        assert_eq!(fetched.level, 3);
        assert!(store.fetch(&1, "reports").await.unwrap().is_none());
        assert!(store.fetch(&2, "tasks").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store: InMemoryGrantStore<Grant<u64>> = InMemoryGrantStore::new();

        store
            .upsert(Grant::new(1, "tasks".to_string(), 3))
            .await
            .unwrap();
        store
            .upsert(Grant::new(1, "tasks".to_string(), 15))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let fetched = store.fetch(&1, "tasks").await.unwrap().unwrap();
        assert_eq!(fetched.level, 15);
    }

    #[tokio::test]
    async fn test_delete() {
        let store: InMemoryGrantStore<Grant<u64>> = InMemoryGrantStore::new();

        store
            .upsert(Grant::new(1, "tasks".to_string(), 3))
            .await
            .unwrap();

        assert!(store.delete(&1, "tasks").await.unwrap());
        assert!(!store.delete(&1, "tasks").await.unwrap());
        assert!(store.fetch(&1, "tasks").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all_is_per_subject() {
        let store: InMemoryGrantStore<Grant<u64>> = InMemoryGrantStore::new();

        store
            .upsert(Grant::new(1, "tasks".to_string(), 3))
            .await
            .unwrap();
        store
            .upsert(Grant::new(1, "reports".to_string(), 1))
            .await
            .unwrap();
        store
            .upsert(Grant::new(2, "tasks".to_string(), 7))
            .await
            .unwrap();

        assert_eq!(store.delete_all(&1).await.unwrap(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.fetch(&2, "tasks").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let store: InMemoryGrantStore<Grant<u64>> = InMemoryGrantStore::new();

        store
            .upsert(Grant::new(1, "tasks".to_string(), 3))
            .await
            .unwrap();
        store
            .upsert(Grant::new(1, "reports".to_string(), 1))
            .await
            .unwrap();

        let records = store.fetch_all(&1).await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
