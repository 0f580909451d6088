//! Catalog provider trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::Catalog;

#[cfg(test)]
use mockall::automock;

/// Source of the option lists the editor offers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync + Debug {
    async fn catalog(&self) -> Result<Catalog, DomainError>;
}
