//! Catalog domain - option sets for agents, models, strategies and metrics

mod entity;
mod provider;

pub use entity::{Catalog, CatalogOption, MetricGroups, MetricOption};
pub use provider::CatalogProvider;

#[cfg(test)]
pub use provider::MockCatalogProvider;
