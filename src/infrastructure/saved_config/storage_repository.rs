//! Storage-backed saved config repository

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::saved_config::{
    normalize_name, SavedConfig, SavedConfigId, SavedConfigRepository,
};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

/// Storage-backed implementation of SavedConfigRepository
#[derive(Debug)]
pub struct StorageSavedConfigRepository {
    storage: Arc<dyn Storage<SavedConfig>>,
}

impl StorageSavedConfigRepository {
    pub fn new(storage: Arc<dyn Storage<SavedConfig>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SavedConfigRepository for StorageSavedConfigRepository {
    async fn get(&self, id: &SavedConfigId) -> Result<Option<SavedConfig>, DomainError> {
        self.storage.get(id).await
    }

    async fn list(&self) -> Result<Vec<SavedConfig>, DomainError> {
        let mut configs = self.storage.list().await?;
        configs.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(configs)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SavedConfig>, DomainError> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return Ok(None);
        }

        let configs = self.storage.list().await?;
        Ok(configs
            .into_iter()
            .find(|c| normalize_name(c.name()) == wanted))
    }

    async fn create(&self, config: SavedConfig) -> Result<SavedConfig, DomainError> {
        if self.storage.exists(config.id()).await? {
            return Err(DomainError::conflict(format!(
                "Saved config '{}' already exists",
                config.id()
            )));
        }

        self.storage.create(config).await
    }

    async fn update(&self, config: SavedConfig) -> Result<SavedConfig, DomainError> {
        if !self.storage.exists(config.id()).await? {
            return Err(DomainError::not_found(format!(
                "Saved config '{}' not found",
                config.id()
            )));
        }

        self.storage.update(config).await
    }

    async fn delete(&self, id: &SavedConfigId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }
}
