//! API routes under `/api`

mod catalog;
mod configs;
mod datasets;
mod drafts;
mod results;
mod runs;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::state::AppState;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::get_catalog))
        .route("/drafts/empty", get(drafts::empty_draft))
        .route("/drafts/validate", post(drafts::validate_draft))
        .route("/drafts/set", post(drafts::set_draft_field))
        .route(
            "/configs",
            get(configs::list_configs).post(configs::create_config),
        )
        .route(
            "/configs/{id}",
            get(configs::get_config)
                .put(configs::replace_config)
                .delete(configs::delete_config),
        )
        .route("/configs/{id}/fields", patch(configs::set_config_field))
        .route("/configs/{id}/validation", get(configs::config_validation))
        .route("/configs/{id}/duplicate", post(configs::duplicate_config))
        .route("/configs/{id}/agents", post(configs::add_agent))
        .route(
            "/configs/{id}/agents/{index}",
            axum::routing::delete(configs::remove_agent),
        )
        .route(
            "/configs/{id}/agents/{index}/duplicate",
            post(configs::duplicate_agent),
        )
        .route(
            "/configs/{id}/agents/{index}/type",
            put(configs::change_agent_type),
        )
        .route("/configs/{id}/run", post(configs::run_config))
        .route("/runs", post(runs::submit_run))
        .route("/runs/{job_id}", get(runs::run_status))
        .route("/runs/{job_id}/logs", get(runs::run_logs))
        .route("/results", get(results::list_results))
        .route("/results/grouped", get(results::grouped_results))
        .route("/results/{id}", get(results::get_result))
        .route("/results/{id}/queries", get(results::result_queries))
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets/{id}/corpus", get(datasets::get_corpus))
        .route("/datasets/{id}/test_set", get(datasets::get_test_set))
}
