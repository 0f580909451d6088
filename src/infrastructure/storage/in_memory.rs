//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Thread-safe in-memory storage
///
/// Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Creates storage pre-populated with entities
    pub fn with_entities(entities: Vec<E>) -> Self {
        let map = entities
            .into_iter()
            .map(|entity| (entity.key().as_str().to_string(), entity))
            .collect();

        Self {
            entities: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, E>>, DomainError> {
        self.entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, E>>, DomainError> {
        self.entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.read()?.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.write()?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.write()?;

        match entities.get_mut(&key) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(entity)
            }
            None => Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            ))),
        }
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.write()?.remove(key.as_str()).is_some())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.read()?.contains_key(key.as_str()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.write()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::ExperimentConfig;
    use crate::domain::saved_config::SavedConfig;

    fn saved(name: &str) -> SavedConfig {
        SavedConfig::new(ExperimentConfig {
            name: name.to_string(),
            ..ExperimentConfig::empty()
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage = InMemoryStorage::new();
        let item = saved("Baseline");

        storage.create(item.clone()).await.unwrap();

        assert_eq!(storage.get(item.id()).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let storage = InMemoryStorage::new();
        let item = saved("Baseline");

        storage.create(item.clone()).await.unwrap();
        let err = storage.create(item).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let storage: InMemoryStorage<SavedConfig> = InMemoryStorage::new();
        let err = storage.update(saved("Ghost")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_count_clear() {
        let first = saved("One");
        let second = saved("Two");
        let storage = InMemoryStorage::with_entities(vec![first.clone(), second]);

        assert_eq!(storage.count().await.unwrap(), 2);
        assert!(storage.delete(first.id()).await.unwrap());
        assert!(!storage.delete(first.id()).await.unwrap());
        assert!(!storage.exists(first.id()).await.unwrap());

        storage.clear().await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
    }
}
