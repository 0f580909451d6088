//! End-to-end tests of the HTTP API

use std::path::Path;

use agentlab::api::create_router;
use agentlab::config::{AppConfig, StorageBackend};
use agentlab::create_app_state_with_config;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn app(data: &TempDir, backend: Option<&MockServer>) -> Router {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.data.datasets_dir = data.path().join("datasets");
    config.data.results_dir = data.path().join("results");
    config.backend.base_url = backend.map(|server| server.uri());

    let state = create_app_state_with_config(&config).await.unwrap();
    create_router(state, None)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn ready_config(name: &str) -> Value {
    json!({
        "name": name,
        "data_ingestion": {"dataset_id": "finance"},
        "chunking": {"chunking_type": "recursive"},
        "qdrant_db": {"parameters": {"embedding": {"embedding_model": "titan-embed"}}},
        "agents": [{
            "id": "agent-1",
            "name": "Agent 1",
            "agent_type": "rag_agent",
            "retriever": {"retriever_type": "dense", "top_k": 5},
            "llm": {"model": "claude-haiku"}
        }],
        "evaluation": {
            "metrics": {"retrieval": ["recall_at_k"]},
            "judge_llm": {"model": "judge"}
        }
    })
}

fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_health_endpoints() {
    let data = TempDir::new().unwrap();
    let app = app(&data, None).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"].as_array().unwrap().len(), 2);

    let (status, _) = send_raw(&app, Method::GET, "/live", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_builtin_catalog_without_backend() {
    let data = TempDir::new().unwrap();
    let app = app(&data, None).await;

    let (status, body) = send(&app, Method::GET, "/api/catalog", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["agent_types"]
        .as_array()
        .unwrap()
        .iter()
        .any(|option| option["id"] == "rag_agent"));
}

#[tokio::test]
async fn test_draft_editing() {
    let data = TempDir::new().unwrap();
    let app = app(&data, None).await;

    let (status, seeded) = send(&app, Method::GET, "/api/drafts/empty?seeded=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded["agents"][0]["id"], "agent-1");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/drafts/set",
        Some(json!({"config": seeded, "path": "agents[0].llm.model", "value": "claude-haiku"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["agents"][0]["llm"]["model"], "claude-haiku");
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["errors"][0], "Experiment name is required.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/drafts/validate",
        Some(json!({"config": ready_config("Baseline")})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"is_valid": true, "errors": []}));
}

#[tokio::test]
async fn test_draft_edit_errors() {
    let data = TempDir::new().unwrap();
    let app = app(&data, None).await;
    let config = json!({});

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/drafts/set",
        Some(json!({"config": config, "path": "agents[3].name", "value": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "path");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/drafts/set",
        Some(json!({"config": config, "path": "chunking.bogus", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "validation_error");
}

#[tokio::test]
async fn test_saved_config_lifecycle() {
    let data = TempDir::new().unwrap();
    let app = app(&data, None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/configs",
        Some(json!({"config": {"name": "Half done"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Select a dataset."));

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/configs",
        Some(json!({"config": ready_config("Baseline")})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/configs",
        Some(json!({"config": ready_config(" baseline ")})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, edited) = send(
        &app,
        Method::PATCH,
        &format!("/api/configs/{}/fields", id),
        Some(json!({"path": ["agents", 0, "retriever", "top_k"], "value": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["config"]["agents"][0]["retriever"]["top_k"], 0);
    assert_eq!(
        edited["validation"]["errors"],
        json!(["Agent 1: set Top K (> 0)."])
    );

    let (status, added) = send(&app, Method::POST, &format!("/api/configs/{}/agents", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["agent_index"], 1);
    assert_eq!(added["config"]["agents"][1]["id"], "agent-2");

    let (status, removed) = send(
        &app,
        Method::DELETE,
        &format!("/api/configs/{}/agents/1", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["config"]["agents"].as_array().unwrap().len(), 1);

    let (status, copy) = send(&app, Method::POST, &format!("/api/configs/{}/duplicate", id), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["name"], "Baseline Copy");

    let (status, listed) = send(&app, Method::GET, "/api/configs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (status, _) = send_raw(&app, Method::DELETE, &format!("/api/configs/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/api/configs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");

    let (status, body) = send(&app, Method::GET, "/api/configs/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "id");
}

#[tokio::test]
async fn test_runs_unavailable_without_backend() {
    let data = TempDir::new().unwrap();
    let app = app(&data, None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/runs",
        Some(json!({"config": ready_config("Baseline")})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "service_unavailable_error");
}

#[tokio::test]
async fn test_submit_and_follow_run() {
    let data = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/runs/job-1/logs"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(concat!(
                    "data: {\"type\":\"log\",\"timestamp\":\"t1\",\"message\":\"Indexing corpus\"}\n\n",
                    "data: {\"type\":\"complete\",\"timestamp\":\"t2\",\"result_path\":\"results/run-1\"}\n\n",
                )),
        )
        .mount(&server)
        .await;

    let app = app(&data, Some(&server)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/runs",
        Some(json!({"config": {"name": "Incomplete"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Select a dataset."));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/runs",
        Some(json!({"config": ready_config("Baseline")})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["job_id"], "job-1");

    let (status, bytes) = send_raw(&app, Method::GET, "/api/runs/job-1/logs", None).await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("Indexing corpus"));
    assert!(text.contains("event: outcome"));
    assert!(text.contains("\"outcome\":\"completed\""));
    assert!(text.contains("results/run-1"));
}

#[tokio::test]
async fn test_backend_failure_is_bad_gateway() {
    let data = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/job-9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let app = app(&data, Some(&server)).await;
    let (status, body) = send(&app, Method::GET, "/api/runs/job-9", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "backend_error");
}

#[tokio::test]
async fn test_results_and_datasets() {
    let data = TempDir::new().unwrap();
    write_file(
        &data.path().join("results/run-a/report.json"),
        &json!({
            "experiment": {
                "experiment_id": "exp-a",
                "name": "Baseline",
                "start_time": "2024-05-01T09:00:00",
                "end_time": "2024-05-01T10:00:00",
                "duration_seconds": 3600.0,
                "dataset_id": "finance",
                "experiment_dir": "results/run-a"
            },
            "results": {}
        })
        .to_string(),
    );
    write_file(
        &data.path().join("datasets/finance/corpus.json"),
        r#"[{"id": 1, "text": "doc"}]"#,
    );
    write_file(
        &data.path().join("datasets/finance/test_set.json"),
        r#"[{"query": "q"}]"#,
    );

    let app = app(&data, None).await;

    let (status, body) = send(&app, Method::GET, "/api/results", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["experiment_id"], "exp-a");

    let (status, body) = send(&app, Method::GET, "/api/results/run-a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["experiment"]["name"], "Baseline");

    let (status, _) = send(&app, Method::GET, "/api/results/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/datasets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["finance"]));

    let (status, body) = send(&app, Method::GET, "/api/datasets/finance/test_set", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["query"], "q");

    let (status, _) = send(&app, Method::GET, "/api/datasets/ghost/corpus", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
