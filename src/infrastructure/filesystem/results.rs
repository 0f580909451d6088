//! Experiment reports read from result directories

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::results::{sort_newest_first, Report, ResultSummary, ResultsSource};
use crate::domain::DomainError;

const REPORT_FILE: &str = "report.json";

/// One readable `report.json`
struct ReportEntry {
    dir_name: String,
    report_path: PathBuf,
    raw: Value,
    report: Report,
}

/// Result directories under a root, each with a `report.json`
///
/// Unreadable or malformed reports are skipped.
#[derive(Debug, Clone)]
pub struct FsResultsSource {
    root: PathBuf,
}

impl FsResultsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn scan(&self) -> Result<Vec<ReportEntry>, DomainError> {
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

        let mut reports = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to scan results: {}", e)))?
        {
            let dir = entry.path();
            if !super::is_dir(&dir).await {
                continue;
            }

            let report_path = dir.join(REPORT_FILE);
            let Ok(bytes) = tokio::fs::read(&report_path).await else {
                continue;
            };

            let parsed = serde_json::from_slice::<Value>(&bytes).and_then(|raw| {
                serde_json::from_value::<Report>(raw.clone()).map(|report| (raw, report))
            });

            match parsed {
                Ok((raw, report)) => reports.push(ReportEntry {
                    dir_name: entry.file_name().to_string_lossy().into_owned(),
                    report_path,
                    raw,
                    report,
                }),
                Err(e) => {
                    warn!(path = %report_path.display(), error = %e, "Skipping malformed report");
                }
            }
        }

        Ok(reports)
    }
}

fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[async_trait]
impl ResultsSource for FsResultsSource {
    async fn list(&self) -> Result<Vec<ResultSummary>, DomainError> {
        let mut summaries: Vec<_> = self
            .scan()
            .await?
            .iter()
            .map(|entry| {
                ResultSummary::from_report(
                    &entry.report,
                    entry.dir_name.clone(),
                    posix_path(&entry.report_path),
                )
            })
            .collect();

        sort_newest_first(&mut summaries);
        debug!(count = summaries.len(), "Listed results");
        Ok(summaries)
    }

    async fn get_raw(&self, id: &str) -> Result<Option<Value>, DomainError> {
        Ok(self
            .scan()
            .await?
            .into_iter()
            .find(|entry| entry.report.experiment.experiment_id == id || entry.dir_name == id)
            .map(|entry| entry.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_report(root: &Path, dir: &str, id: &str, name: &str, end: &str) {
        let path = root.join(dir);
        std::fs::create_dir_all(&path).unwrap();
        let report = json!({
            "experiment": {
                "experiment_id": id,
                "name": name,
                "start_time": "2024-05-01T09:00:00",
                "end_time": end,
                "duration_seconds": 12.5,
                "dataset_id": "finance",
                "experiment_dir": format!("results/{}", dir)
            },
            "results": {"zeta": {}, "alpha": {}}
        });
        std::fs::write(path.join(REPORT_FILE), report.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_list_newest_first_skipping_malformed() {
        let root = TempDir::new().unwrap();
        write_report(root.path(), "run-a", "exp-a", "Baseline", "2024-05-01T10:00:00");
        write_report(root.path(), "run-b", "exp-b", "Baseline", "2024-05-02T10:00:00");
        std::fs::create_dir_all(root.path().join("broken")).unwrap();
        std::fs::write(root.path().join("broken").join(REPORT_FILE), "{").unwrap();
        std::fs::create_dir_all(root.path().join("empty")).unwrap();
        std::fs::write(root.path().join(REPORT_FILE), "{}").unwrap();
        std::fs::write(root.path().join("notes.txt"), "stray").unwrap();

        let source = FsResultsSource::new(root.path());
        let summaries = source.list().await.unwrap();

        let ids: Vec<_> = summaries.iter().map(|s| s.experiment_id.as_str()).collect();
        assert_eq!(ids, vec!["exp-b", "exp-a"]);
        assert_eq!(summaries[0].agents, vec!["alpha", "zeta"]);
        assert!(summaries[0].report_path.ends_with("run-b/report.json"));
    }

    #[tokio::test]
    async fn test_get_by_experiment_id_or_dir_name() {
        let root = TempDir::new().unwrap();
        write_report(root.path(), "run-a", "exp-a", "Baseline", "2024-05-01T10:00:00Z");
        let source = FsResultsSource::new(root.path());

        let by_id = source.get_raw("exp-a").await.unwrap().unwrap();
        let by_dir = source.get_raw("run-a").await.unwrap().unwrap();
        assert_eq!(by_id, by_dir);
        assert_eq!(by_id["experiment"]["name"], "Baseline");

        assert!(source.get_raw("nope").await.unwrap().is_none());
        assert_eq!(source.get("exp-a").await.unwrap().unwrap().agent_names().len(), 2);
    }

    #[tokio::test]
    async fn test_grouped_by_name() {
        let root = TempDir::new().unwrap();
        write_report(root.path(), "r1", "e1", "Baseline", "2024-05-01T10:00:00");
        write_report(root.path(), "r2", "e2", "Tuned", "2024-05-03T10:00:00");
        write_report(root.path(), "r3", "e3", "Baseline", "2024-05-02T10:00:00");
        let source = FsResultsSource::new(root.path());

        let groups = source.grouped().await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].experiment_name, "Tuned");
        let runs: Vec<_> = groups[1].runs.iter().map(|r| r.experiment_id.as_str()).collect();
        assert_eq!(runs, vec!["e3", "e1"]);
    }

    #[tokio::test]
    async fn test_plain_files_in_root_are_ignored() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("run-a"), "not a directory").unwrap();
        write_report(root.path(), "run-b", "exp-b", "Baseline", "2024-05-02T10:00:00");
        let source = FsResultsSource::new(root.path());

        let summaries = source.list().await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].dir_name, "run-b");
        assert!(source.get_raw("run-a").await.unwrap().is_none());
    }
}
