//! Evaluation reports and the summaries built from them

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Report
// ============================================================================

/// Header of a `report.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    pub experiment_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub dataset_id: String,
    pub experiment_dir: String,
}

/// A finished run; per-agent payloads stay opaque until inspected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub experiment: ExperimentMetadata,
    pub results: BTreeMap<String, Value>,
}

/// Accepts RFC 3339 timestamps and offset-less ones (read as UTC)
fn lenient_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricResult {
    pub name: String,
    pub value: Option<Value>,
    pub passed: Option<bool>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub metadata: Option<Value>,
}

/// Test set query ids are strings in most datasets and integers in some
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEvaluationResult {
    pub query_id: QueryId,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub final_agent_state: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationData {
    pub per_query_results: Vec<QueryEvaluationResult>,
    pub aggregate_results: Vec<MetricResult>,
}

// ============================================================================
// Per-query comparison
// ============================================================================

/// One agent's answer to one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentQueryResult {
    pub answer: Option<String>,
    pub error: Option<String>,
    pub metrics: Vec<MetricResult>,
    pub final_state: Option<Value>,
}

/// The same query across every agent of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRow {
    pub query_id: QueryId,
    pub query: String,
    pub agents: BTreeMap<String, AgentQueryResult>,
}

impl Report {
    /// Agent names in report order
    pub fn agent_names(&self) -> Vec<String> {
        self.results.keys().cloned().collect()
    }

    /// Typed view of one agent's results; `None` when absent or malformed
    pub fn evaluation(&self, agent: &str) -> Option<EvaluationData> {
        self.results
            .get(agent)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Rows keyed by query id: numeric ids first in numeric order, then
    /// the others lexicographically
    pub fn per_query_rows(&self) -> Vec<QueryRow> {
        let mut rows: Vec<QueryRow> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();

        for agent in self.results.keys() {
            let Some(data) = self.evaluation(agent) else {
                continue;
            };

            for result in data.per_query_results {
                let key = result.query_id.to_string();
                let position = *index.entry(key).or_insert_with(|| {
                    rows.push(QueryRow {
                        query_id: result.query_id.clone(),
                        query: result.query.clone(),
                        agents: BTreeMap::new(),
                    });
                    rows.len() - 1
                });

                let row = &mut rows[position];
                if row.query.is_empty() {
                    row.query = result.query.clone();
                }

                let answer = result
                    .final_agent_state
                    .as_ref()
                    .and_then(|state| state.get("answer"))
                    .and_then(Value::as_str)
                    .map(str::to_string);

                row.agents.insert(
                    agent.clone(),
                    AgentQueryResult {
                        answer,
                        error: result.error,
                        metrics: result.metrics,
                        final_state: result.final_agent_state,
                    },
                );
            }
        }

        rows.sort_by(|a, b| compare_query_ids(&a.query_id, &b.query_id));
        rows
    }
}

/// Numeric ids sort before text ids; numbers by value, text as strings
fn compare_query_ids(a: &QueryId, b: &QueryId) -> Ordering {
    match (query_sort_key(a), query_sort_key(b)) {
        (SortKey::Numeric(x, ta), SortKey::Numeric(y, tb)) => {
            x.total_cmp(&y).then_with(|| ta.cmp(&tb))
        }
        (SortKey::Numeric(..), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Numeric(..)) => Ordering::Greater,
        (SortKey::Text(ta), SortKey::Text(tb)) => ta.cmp(&tb),
    }
}

enum SortKey {
    Numeric(f64, String),
    Text(String),
}

fn query_sort_key(id: &QueryId) -> SortKey {
    let text = id.to_string();
    match text.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => SortKey::Numeric(value, text),
        _ => SortKey::Text(text),
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// Listing entry for one result directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub experiment_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dataset_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub agents: Vec<String>,
    pub dir_name: String,
    pub report_path: String,
}

impl ResultSummary {
    pub fn from_report(report: &Report, dir_name: impl Into<String>, report_path: impl Into<String>) -> Self {
        let experiment = &report.experiment;
        let mut agents = report.agent_names();
        agents.sort();

        Self {
            experiment_id: experiment.experiment_id.clone(),
            name: experiment.name.clone(),
            description: experiment.description.clone(),
            dataset_id: experiment.dataset_id.clone(),
            start_time: experiment.start_time,
            end_time: experiment.end_time,
            duration_seconds: experiment.duration_seconds,
            agents,
            dir_name: dir_name.into(),
            report_path: report_path.into(),
        }
    }

    /// Matches either the experiment id or the result directory name
    pub fn matches(&self, id: &str) -> bool {
        self.experiment_id == id || self.dir_name == id
    }
}

/// Runs of one experiment name, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub experiment_name: String,
    pub latest_description: Option<String>,
    pub latest_dataset_id: Option<String>,
    pub runs: Vec<ResultSummary>,
}

/// Sorts summaries newest first by end time
pub fn sort_newest_first(summaries: &mut [ResultSummary]) {
    summaries.sort_by(|a, b| b.end_time.cmp(&a.end_time));
}

/// Groups runs by experiment name; groups are ordered by their newest run
pub fn group_by_experiment(mut summaries: Vec<ResultSummary>) -> Vec<ResultGroup> {
    sort_newest_first(&mut summaries);

    let mut groups: Vec<ResultGroup> = Vec::new();
    for summary in summaries {
        match groups
            .iter_mut()
            .find(|group| group.experiment_name == summary.name)
        {
            Some(group) => group.runs.push(summary),
            None => groups.push(ResultGroup {
                experiment_name: summary.name.clone(),
                latest_description: summary.description.clone(),
                latest_dataset_id: Some(summary.dataset_id.clone()),
                runs: vec![summary],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> Report {
        serde_json::from_value(json!({
            "experiment": {
                "experiment_id": "exp-1",
                "name": "Baseline",
                "description": "first pass",
                "start_time": "2024-05-01T10:00:00",
                "end_time": "2024-05-01T10:05:00.250Z",
                "duration_seconds": 300.25,
                "dataset_id": "finance",
                "experiment_dir": "results/baseline-1"
            },
            "results": {
                "hyde": {
                    "per_query_results": [
                        {"query_id": "10", "query": "Q10", "final_agent_state": {"answer": "A10h"}, "metrics": [{"name": "recall", "value": 1.0}]},
                        {"query_id": "2", "query": "Q2", "error": "timeout", "metrics": []}
                    ],
                    "aggregate_results": []
                },
                "simple_rag": {
                    "per_query_results": [
                        {"query_id": 2, "query": "", "final_agent_state": {"answer": "A2s"}, "metrics": []}
                    ]
                }
            }
        }))
        .unwrap()
    }

    fn summary(name: &str, id: &str, end: &str) -> ResultSummary {
        let end_time = DateTime::parse_from_rfc3339(end).unwrap().with_timezone(&Utc);
        ResultSummary {
            experiment_id: id.to_string(),
            name: name.to_string(),
            description: Some(format!("{} description", id)),
            dataset_id: format!("{}-data", id),
            start_time: end_time,
            end_time,
            duration_seconds: 1.0,
            agents: vec![],
            dir_name: id.to_string(),
            report_path: format!("results/{}/report.json", id),
        }
    }

    #[test]
    fn test_report_accepts_naive_timestamps() {
        let report = report();
        assert_eq!(report.experiment.start_time.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_per_query_rows_merge_agents_and_sort_numerically() {
        let rows = report().per_query_rows();

        let ids: Vec<_> = rows.iter().map(|r| r.query_id.to_string()).collect();
        assert_eq!(ids, vec!["2", "10"]);

        let q2 = &rows[0];
        assert_eq!(q2.query, "Q2");
        assert_eq!(q2.agents["hyde"].error.as_deref(), Some("timeout"));
        assert_eq!(q2.agents["simple_rag"].answer.as_deref(), Some("A2s"));

        let q10 = &rows[1];
        assert_eq!(q10.agents.len(), 1);
        assert_eq!(q10.agents["hyde"].answer.as_deref(), Some("A10h"));
    }

    #[test]
    fn test_per_query_rows_lexicographic_for_text_ids() {
        let mut report = report();
        report.results = BTreeMap::from([(
            "a".to_string(),
            json!({"per_query_results": [
                {"query_id": "q-b", "query": "B"},
                {"query_id": "q-a", "query": "A"}
            ]}),
        )]);

        let ids: Vec<_> = report
            .per_query_rows()
            .iter()
            .map(|r| r.query_id.to_string())
            .collect();
        assert_eq!(ids, vec!["q-a", "q-b"]);
    }

    #[test]
    fn test_per_query_rows_mixed_ids_numbers_first() {
        let mut results = Vec::new();
        for i in 0..40 {
            results.push(json!({"query_id": i.to_string(), "query": "n"}));
            results.push(json!({"query_id": format!("{}a", i), "query": "t"}));
        }
        let mut report = report();
        report.results = BTreeMap::from([(
            "a".to_string(),
            json!({"per_query_results": results}),
        )]);

        let ids: Vec<_> = report
            .per_query_rows()
            .iter()
            .map(|r| r.query_id.to_string())
            .collect();

        assert_eq!(ids.len(), 80);
        assert_eq!(&ids[..3], &["0", "1", "2"]);
        assert_eq!(ids[39], "39");
        assert_eq!(&ids[40..43], &["0a", "10a", "11a"]);
    }

    #[test]
    fn test_query_id_order_is_transitive() {
        let nine = QueryId::Text("9".to_string());
        let ten = QueryId::Number(10);
        let text = QueryId::Text("1a".to_string());

        assert_eq!(compare_query_ids(&nine, &ten), Ordering::Less);
        assert_eq!(compare_query_ids(&ten, &text), Ordering::Less);
        assert_eq!(compare_query_ids(&nine, &text), Ordering::Less);
    }

    #[test]
    fn test_summary_from_report() {
        let summary = ResultSummary::from_report(&report(), "baseline-1", "results/baseline-1/report.json");

        assert_eq!(summary.agents, vec!["hyde", "simple_rag"]);
        assert!(summary.matches("exp-1"));
        assert!(summary.matches("baseline-1"));
        assert!(!summary.matches("other"));
    }

    #[test]
    fn test_group_by_experiment() {
        let groups = group_by_experiment(vec![
            summary("Baseline", "b1", "2024-05-01T10:00:00Z"),
            summary("Tuned", "t1", "2024-05-03T10:00:00Z"),
            summary("Baseline", "b2", "2024-05-02T10:00:00Z"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].experiment_name, "Tuned");
        assert_eq!(groups[1].experiment_name, "Baseline");

        let baseline: Vec<_> = groups[1].runs.iter().map(|r| r.experiment_id.as_str()).collect();
        assert_eq!(baseline, vec!["b2", "b1"]);
        assert_eq!(groups[1].latest_description.as_deref(), Some("b2 description"));
        assert_eq!(groups[1].latest_dataset_id.as_deref(), Some("b2-data"));
    }
}
