//! Saved config persistence

mod storage_repository;

pub use storage_repository::StorageSavedConfigRepository;
