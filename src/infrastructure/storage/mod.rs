//! Storage infrastructure - Storage implementations

mod in_memory;
mod json_file;

pub use in_memory::InMemoryStorage;
pub use json_file::JsonFileStorage;
