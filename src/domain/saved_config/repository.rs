//! Saved config repository trait

use async_trait::async_trait;

use super::{SavedConfig, SavedConfigId};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for saved configs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SavedConfigRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: &SavedConfigId) -> Result<Option<SavedConfig>, DomainError>;

    /// All saved configs, most recently updated first
    async fn list(&self) -> Result<Vec<SavedConfig>, DomainError>;

    /// Finds a config by name (trimmed, case-insensitive)
    async fn find_by_name(&self, name: &str) -> Result<Option<SavedConfig>, DomainError>;

    async fn create(&self, config: SavedConfig) -> Result<SavedConfig, DomainError>;

    async fn update(&self, config: SavedConfig) -> Result<SavedConfig, DomainError>;

    async fn delete(&self, id: &SavedConfigId) -> Result<bool, DomainError>;
}
