//! Field paths into nested JSON documents

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::mutator::PathError;

/// One dotted piece of a textual path: an optional key followed by `[n]` indices
static PIECE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[^.\[\]]*)(?P<indices>(?:\[\d+\])*)$").unwrap());

static INDEX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").unwrap());

/// A single step into a document: an object key or an array position
///
/// Serialized untagged so a path travels as a plain JSON array such as
/// `["agents", 0, "llm", "model"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    pub fn index(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Non-empty ordered sequence of segments locating one field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PathSegment>", into = "Vec<PathSegment>")]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `segment` appended
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// True when one path is a prefix of the other (the edits overlap)
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(left, right)| left == right)
    }

    /// Display form of the first `len` segments, `$` for the document root
    pub fn display_prefix(&self, len: usize) -> String {
        if len == 0 {
            return "$".to_string();
        }
        render(&self.0[..len.min(self.0.len())])
    }
}

/// Builds a [`FieldPath`] from a list of keys and indices
///
/// ```
/// use agentlab::field_path;
/// let path = field_path!["agents", 0usize, "llm", "model"];
/// assert_eq!(path.to_string(), "agents[0].llm.model");
/// ```
#[macro_export]
macro_rules! field_path {
    ($($segment:expr),+ $(,)?) => {
        $crate::domain::document::FieldPath::new(vec![
            $($crate::domain::document::PathSegment::from($segment)),+
        ])
        .expect("field_path! takes at least one segment")
    };
}

impl TryFrom<Vec<PathSegment>> for FieldPath {
    type Error = PathError;

    fn try_from(segments: Vec<PathSegment>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<FieldPath> for Vec<PathSegment> {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    /// Parses `agents[0].llm.model`; an all-digit dotted piece (`agents.0`)
    /// is read as an index
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();

        for piece in trimmed.split('.') {
            let captures = PIECE_PATTERN.captures(piece).ok_or_else(|| PathError::Parse {
                input: input.to_string(),
                reason: format!("unexpected characters in '{}'", piece),
            })?;

            let key = captures.name("key").map_or("", |m| m.as_str());
            let indices = captures.name("indices").map_or("", |m| m.as_str());

            if key.is_empty() && indices.is_empty() {
                return Err(PathError::Parse {
                    input: input.to_string(),
                    reason: "empty segment".to_string(),
                });
            }

            if !key.is_empty() {
                match key.parse::<usize>() {
                    Ok(index) if key.bytes().all(|b| b.is_ascii_digit()) => {
                        segments.push(PathSegment::Index(index))
                    }
                    _ => segments.push(PathSegment::Key(key.to_string())),
                }
            }

            for index in INDEX_PATTERN.captures_iter(indices) {
                let value = index[1].parse::<usize>().map_err(|e| PathError::Parse {
                    input: input.to_string(),
                    reason: e.to_string(),
                })?;
                segments.push(PathSegment::Index(value));
            }
        }

        Self::new(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(&self.0))
    }
}

fn render(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push_str(&format!("[{}]", index));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_path_with_indices() {
        let path: FieldPath = "agents[0].retriever.top_k".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::key("agents"),
                PathSegment::index(0),
                PathSegment::key("retriever"),
                PathSegment::key("top_k"),
            ]
        );
    }

    #[test]
    fn test_parse_numeric_piece_as_index() {
        let path: FieldPath = "evaluation.run.include_agents.2".parse().unwrap();
        assert_eq!(path.segments().last(), Some(&PathSegment::Index(2)));
    }

    #[test]
    fn test_parse_nested_indices() {
        let path: FieldPath = "matrix[1][2]".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "matrix[1][2]");
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(matches!("".parse::<FieldPath>(), Err(PathError::Empty)));
        assert!(matches!(
            "agents..name".parse::<FieldPath>(),
            Err(PathError::Parse { .. })
        ));
        assert!(matches!(
            "agents[x]".parse::<FieldPath>(),
            Err(PathError::Parse { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let text = "qdrant_db.parameters.embedding.embedding_model";
        let path: FieldPath = text.parse().unwrap();
        assert_eq!(path.to_string(), text);
    }

    #[test]
    fn test_json_array_form() {
        let path: FieldPath = serde_json::from_str(r#"["agents", 1, "llm", "model"]"#).unwrap();
        assert_eq!(path.to_string(), "agents[1].llm.model");

        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["agents",1,"llm","model"]"#);
    }

    #[test]
    fn test_json_array_form_rejects_empty() {
        assert!(serde_json::from_str::<FieldPath>("[]").is_err());
    }

    #[test]
    fn test_overlaps() {
        let agents: FieldPath = "agents".parse().unwrap();
        let model: FieldPath = "agents[0].llm.model".parse().unwrap();
        let name: FieldPath = "name".parse().unwrap();

        assert!(agents.overlaps(&model));
        assert!(model.overlaps(&agents));
        assert!(!model.overlaps(&name));
    }

    #[test]
    fn test_field_path_macro() {
        let path = crate::field_path!["agents", 0usize, "name"];
        assert_eq!(path.to_string(), "agents[0].name");
        assert_eq!(path.display_prefix(0), "$");
        assert_eq!(path.display_prefix(2), "agents[0]");
    }
}
