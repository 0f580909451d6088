//! Results domain - evaluation reports, run summaries and per-query views

mod entity;
mod source;

pub use entity::{
    group_by_experiment, sort_newest_first, AgentQueryResult, EvaluationData, ExperimentMetadata,
    MetricResult, QueryEvaluationResult, QueryId, QueryRow, Report, ResultGroup, ResultSummary,
};
pub use source::ResultsSource;
