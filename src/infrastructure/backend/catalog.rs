//! Catalog fetched from the evaluation backend

use async_trait::async_trait;
use tracing::debug;

use super::http_client::HttpClientTrait;
use super::run_backend::decode;
use crate::domain::catalog::{Catalog, CatalogProvider};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct HttpCatalogProvider<C: HttpClientTrait> {
    client: C,
    url: String,
}

impl<C: HttpClientTrait> HttpCatalogProvider<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/catalog", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> CatalogProvider for HttpCatalogProvider<C> {
    async fn catalog(&self) -> Result<Catalog, DomainError> {
        let response = self.client.get_json(&self.url).await?;
        let catalog: Catalog = decode(response, "catalog")?;

        debug!(
            agent_types = catalog.agent_types.len(),
            llm_models = catalog.llm_models.len(),
            "Fetched catalog from backend"
        );
        Ok(catalog)
    }
}
