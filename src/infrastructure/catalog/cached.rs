use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use crate::domain::catalog::{Catalog, CatalogProvider};
use crate::domain::DomainError;

/// Catalog provider wrapper that keeps the last catalog for a TTL
///
/// Failed fetches are not cached.
#[derive(Debug)]
pub struct CachedCatalogProvider<P: CatalogProvider> {
    inner: P,
    cache: Cache<(), Catalog>,
}

impl<P: CatalogProvider> CachedCatalogProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).max_capacity(1).build();

        Self { inner, cache }
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<P: CatalogProvider> CatalogProvider for CachedCatalogProvider<P> {
    async fn catalog(&self) -> Result<Catalog, DomainError> {
        if let Some(cached) = self.cache.get(&()).await {
            tracing::debug!("Cache hit for catalog");
            return Ok(cached);
        }

        tracing::debug!("Cache miss, fetching catalog");
        let catalog = self.inner.catalog().await?;
        self.cache.insert((), catalog.clone()).await;

        Ok(catalog)
    }
}
