use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::dataset::{validate_dataset_id, DatasetFile, DatasetSource};
use crate::domain::DomainError;

/// Datasets as directories under a root, each holding `corpus.json` and `test_set.json`
#[derive(Debug, Clone)]
pub struct FsDatasetSource {
    root: PathBuf,
}

impl FsDatasetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn is_complete(dir: &Path) -> bool {
        let corpus = tokio::fs::try_exists(dir.join(DatasetFile::Corpus.file_name()));
        let test_set = tokio::fs::try_exists(dir.join(DatasetFile::TestSet.file_name()));
        matches!(tokio::join!(corpus, test_set), (Ok(true), Ok(true)))
    }
}

#[async_trait]
impl DatasetSource for FsDatasetSource {
    async fn list(&self) -> Result<Vec<String>, DomainError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.root.display(),
                    e
                )));
            }
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to scan datasets: {}", e)))?
        {
            let path = entry.path();
            if super::is_dir(&path).await && Self::is_complete(&path).await {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        ids.sort_by_key(|id| id.to_lowercase());
        debug!(count = ids.len(), "Listed datasets");
        Ok(ids)
    }

    async fn load(&self, id: &str, file: DatasetFile) -> Result<Value, DomainError> {
        validate_dataset_id(id)?;

        let dir = self.root.join(id);
        if !super::is_dir(&dir).await {
            return Err(DomainError::not_found(format!("Dataset '{}' not found", id)));
        }

        let path = dir.join(file.file_name());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::not_found(format!("File not found: {}", file)));
            }
            Err(e) => {
                return Err(DomainError::storage(format!("Failed to load {}: {}", file, e)));
            }
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::storage(format!("Failed to load {}: {}", file, e)))
    }
}
