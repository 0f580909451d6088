//! Infrastructure layer - External service implementations

pub mod backend;
pub mod catalog;
pub mod filesystem;
pub mod logging;
pub mod observability;
pub mod saved_config;
pub mod services;
pub mod storage;
