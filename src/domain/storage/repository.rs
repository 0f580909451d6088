//! Key-value storage trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// Generic key-value store used for locally persisted records
///
/// Backends only need to guarantee per-call atomicity; uniqueness rules beyond
/// the key (such as unique names) are enforced by the calling repository.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Inserts a new record, failing with `Conflict` when the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Replaces an existing record, failing with `NotFound` when absent
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Returns true when a record was removed
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }

    async fn clear(&self) -> Result<(), DomainError>;
}
