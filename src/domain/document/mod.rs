//! Path-addressed access to nested JSON documents

mod mutator;
mod path;

pub use mutator::{get_at_path, set_at_path, set_in_place, PathError};
pub use path::{FieldPath, PathSegment};
