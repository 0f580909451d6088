//! Saved config domain - named experiment configs kept between sessions

mod entity;
mod repository;

pub use entity::{normalize_name, SavedConfig, SavedConfigId};
pub use repository::SavedConfigRepository;

#[cfg(test)]
pub use repository::MockSavedConfigRepository;
