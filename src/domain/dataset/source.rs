//! Dataset source trait

use std::fmt::{self, Debug};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// The two files every dataset directory carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFile {
    Corpus,
    TestSet,
}

impl DatasetFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Corpus => "corpus.json",
            Self::TestSet => "test_set.json",
        }
    }
}

impl fmt::Display for DatasetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Rejects ids that could address anything but a direct child directory
pub fn validate_dataset_id(id: &str) -> Result<(), DomainError> {
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.contains('\0');
    if invalid {
        return Err(DomainError::validation(format!(
            "Invalid dataset_id '{}'",
            id
        )));
    }
    Ok(())
}

#[async_trait]
pub trait DatasetSource: Send + Sync + Debug {
    /// Ids of complete datasets, sorted case-insensitively
    async fn list(&self) -> Result<Vec<String>, DomainError>;

    /// Parsed contents of one dataset file
    async fn load(&self, id: &str, file: DatasetFile) -> Result<Value, DomainError>;
}
