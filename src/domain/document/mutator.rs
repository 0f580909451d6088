//! Copy-on-write edits of nested JSON documents
//!
//! Every intermediate segment must already resolve to a container of the
//! matching kind; nothing is created implicitly. The final segment may insert
//! a new object key, or append to an array when its index equals the length.

use serde_json::Value;
use thiserror::Error;

use super::path::{FieldPath, PathSegment};
use crate::domain::DomainError;

/// Errors raised while resolving or applying a field path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path must contain at least one segment")]
    Empty,

    #[error("cannot parse path '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("'{at}' does not exist")]
    Missing { at: String },

    #[error("index {index} at '{at}' is out of range for an array of length {len}")]
    IndexOutOfRange { at: String, index: usize, len: usize },

    #[error("'{at}' is {found}, not an object or array")]
    NotAContainer { at: String, found: &'static str },

    #[error("'{at}' is {found}, expected {expected}")]
    KindMismatch {
        at: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl From<PathError> for DomainError {
    fn from(err: PathError) -> Self {
        DomainError::invalid_path(err.to_string())
    }
}

/// Looks up the value at `path`, if every segment resolves
pub fn get_at_path<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |cursor, segment| match (cursor, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get(key),
            (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
            _ => None,
        })
}

/// Returns a copy of `document` with the value at `path` replaced by `value`
///
/// The input is never modified. Branches off the path are carried over as
/// deep copies.
pub fn set_at_path(document: &Value, path: &FieldPath, value: Value) -> Result<Value, PathError> {
    let mut next = document.clone();
    set_in_place(&mut next, path, value)?;
    Ok(next)
}

/// Applies the edit directly to an owned document
pub fn set_in_place(document: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
    let (last, parents) = path.segments().split_last().ok_or(PathError::Empty)?;

    let mut cursor = document;
    for (depth, segment) in parents.iter().enumerate() {
        cursor = descend(cursor, segment, path, depth)?;
    }

    assign(cursor, last, value, path)
}

fn descend<'a>(
    cursor: &'a mut Value,
    segment: &PathSegment,
    path: &FieldPath,
    depth: usize,
) -> Result<&'a mut Value, PathError> {
    match (cursor, segment) {
        (Value::Object(map), PathSegment::Key(key)) => {
            map.get_mut(key).ok_or_else(|| PathError::Missing {
                at: path.display_prefix(depth + 1),
            })
        }
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            items
                .get_mut(*index)
                .ok_or_else(|| PathError::IndexOutOfRange {
                    at: path.display_prefix(depth),
                    index: *index,
                    len,
                })
        }
        (other, segment) => Err(mismatch(other, segment, path.display_prefix(depth))),
    }
}

fn assign(
    target: &mut Value,
    segment: &PathSegment,
    value: Value,
    path: &FieldPath,
) -> Result<(), PathError> {
    let parent = path.display_prefix(path.len() - 1);

    match (target, segment) {
        (Value::Object(map), PathSegment::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            if *index < len {
                items[*index] = value;
                Ok(())
            } else if *index == len {
                items.push(value);
                Ok(())
            } else {
                Err(PathError::IndexOutOfRange {
                    at: parent,
                    index: *index,
                    len,
                })
            }
        }
        (other, segment) => Err(mismatch(other, segment, parent)),
    }
}

fn mismatch(found: &Value, segment: &PathSegment, at: String) -> PathError {
    let found = kind_name(found);
    match (found, segment) {
        ("object", PathSegment::Index(_)) => PathError::KindMismatch {
            at,
            expected: "an array",
            found: "an object",
        },
        ("array", PathSegment::Key(_)) => PathError::KindMismatch {
            at,
            expected: "an object",
            found: "an array",
        },
        _ => PathError::NotAContainer { at, found },
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
