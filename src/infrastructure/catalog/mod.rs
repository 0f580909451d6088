//! Catalog providers

mod cached;
mod static_provider;

pub use cached::CachedCatalogProvider;
pub use static_provider::{builtin_catalog, StaticCatalogProvider};
