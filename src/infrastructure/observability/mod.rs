//! Observability - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_config_save, record_http_request,
    record_run_submit_failure, record_run_submitted, record_validation, PrometheusMetrics,
};
