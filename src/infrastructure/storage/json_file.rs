//! Storage backed by a single JSON array file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Keeps every record in memory and rewrites the whole file on each change
///
/// The file holds a JSON array in insertion order. A missing file is an empty
/// store; an unreadable one falls back to empty, as the browser store did.
#[derive(Debug)]
pub struct JsonFileStorage<E>
where
    E: StorageEntity,
{
    path: PathBuf,
    entities: RwLock<Vec<E>>,
}

impl<E> JsonFileStorage<E>
where
    E: StorageEntity,
{
    /// Opens the store, loading the file if it exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        let entities = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable store file");
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        debug!(path = %path.display(), count = entities.len(), "Opened JSON file store");

        Ok(Self {
            path,
            entities: RwLock::new(entities),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes to a sibling temp file, then renames over the target
    async fn persist(&self, entities: &[E]) -> Result<(), DomainError> {
        let content = serde_json::to_vec_pretty(entities)
            .map_err(|e| DomainError::storage(format!("Failed to serialize store: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &content)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to rename {} to {}: {}",
                tmp.display(),
                self.path.display(),
                e
            ))
        })
    }

    fn position(entities: &[E], key: &str) -> Option<usize> {
        entities
            .iter()
            .position(|entity| entity.key().as_str() == key)
    }
}

#[async_trait]
impl<E> Storage<E> for JsonFileStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self.entities.read().await;
        Ok(Self::position(&entities, key.as_str()).map(|i| entities[i].clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.entities.read().await.clone())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let mut entities = self.entities.write().await;
        let key = entity.key().as_str().to_string();

        if Self::position(&entities, &key).is_some() {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        let mut next = entities.clone();
        next.push(entity.clone());
        self.persist(&next).await?;
        *entities = next;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let mut entities = self.entities.write().await;
        let key = entity.key().as_str().to_string();

        let index = Self::position(&entities, &key).ok_or_else(|| {
            DomainError::not_found(format!("Entity with key '{}' not found", key))
        })?;

        let mut next = entities.clone();
        next[index] = entity.clone();
        self.persist(&next).await?;
        *entities = next;

        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut entities = self.entities.write().await;

        let Some(index) = Self::position(&entities, key.as_str()) else {
            return Ok(false);
        };

        let mut next = entities.clone();
        next.remove(index);
        self.persist(&next).await?;
        *entities = next;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entities = self.entities.write().await;
        self.persist(&[]).await?;
        entities.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::ExperimentConfig;
    use crate::domain::saved_config::SavedConfig;
    use tempfile::TempDir;

    fn saved(name: &str) -> SavedConfig {
        SavedConfig::new(ExperimentConfig {
            name: name.to_string(),
            ..ExperimentConfig::empty()
        })
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let storage: JsonFileStorage<SavedConfig> =
            JsonFileStorage::open(dir.path().join("configs.json")).await.unwrap();

        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_changes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("configs.json");
        let first = saved("Baseline");
        let second = saved("Tuned");

        {
            let storage = JsonFileStorage::open(&path).await.unwrap();
            storage.create(first.clone()).await.unwrap();
            storage.create(second.clone()).await.unwrap();
            storage.delete(first.id()).await.unwrap();
        }

        let reopened: JsonFileStorage<SavedConfig> = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![second]);

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw.is_array());
        assert_eq!(raw[0]["name"], "Tuned");
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("configs.json");
        std::fs::write(&path, "not json").unwrap();

        let storage: JsonFileStorage<SavedConfig> = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_and_conflict() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::open(dir.path().join("c.json")).await.unwrap();
        let mut item = saved("Baseline");
        storage.create(item.clone()).await.unwrap();

        assert!(matches!(
            storage.create(item.clone()).await,
            Err(DomainError::Conflict { .. })
        ));

        item.set_config(ExperimentConfig {
            name: "Renamed".to_string(),
            ..ExperimentConfig::empty()
        });
        storage.update(item.clone()).await.unwrap();

        assert_eq!(storage.get(item.id()).await.unwrap().unwrap().name(), "Renamed");
    }
}
