//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Installs the global recorder; `None` when disabled or already installed
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("agentlab_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at /metrics");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("agentlab_http_requests_total", &labels).increment(1);
    histogram!("agentlab_http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

pub fn record_validation(valid: bool) {
    let result = if valid { "valid" } else { "invalid" };
    counter!("agentlab_validations_total", "result" => result).increment(1);
}

pub fn record_run_submitted() {
    counter!("agentlab_runs_submitted_total").increment(1);
}

/// `reason` is `invalid` for configs that failed validation, `backend` otherwise
pub fn record_run_submit_failure(reason: &'static str) {
    counter!("agentlab_run_submit_failures_total", "reason" => reason).increment(1);
}

/// `operation`: create, update, delete or duplicate
pub fn record_config_save(operation: &'static str) {
    counter!("agentlab_config_saves_total", "operation" => operation).increment(1);
}

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Replaces ids in unmatched paths to keep label cardinality down
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/api/configs/550e8400-e29b-41d4-a716-446655440000/fields";
        assert_eq!(sanitize_path(path), "/api/configs/{id}/fields");
    }

    #[test]
    fn test_sanitize_path_agent_index() {
        assert_eq!(
            sanitize_path("/api/configs/x/agents/3/type"),
            "/api/configs/x/agents/{id}/type"
        );
    }

    #[test]
    fn test_sanitize_path_truncates() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_disabled_metrics_install_nothing() {
        assert!(init_metrics(&MetricsConfig { enabled: false }).is_none());
    }
}
