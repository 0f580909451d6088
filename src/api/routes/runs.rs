//! Run endpoints: submission, status and the log relay

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::run::{JobId, JobStatusReport, LogEvent, RunHandle, RunOutcome, RunRequest};

/// POST /api/runs
pub async fn submit_run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<(StatusCode, Json<RunHandle>), ApiError> {
    let handle = state.run_service()?.submit(request).await?;
    Ok((StatusCode::ACCEPTED, Json(handle)))
}

/// GET /api/runs/{job_id}
pub async fn run_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusReport>, ApiError> {
    Ok(Json(state.run_service()?.status(&job_id).await?))
}

/// GET /api/runs/{job_id}/logs
///
/// Relays the backend's log events as `message` events and finishes with one
/// `outcome` event. Following stops when the client disconnects.
pub async fn run_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let runs = state.run_service()?.clone();
    let job_id = JobId::new(job_id)?;

    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(32);
    let (log_tx, log_rx) = mpsc::channel::<LogEvent>(32);

    tokio::spawn(async move {
        let forward_tx = tx.clone();
        let forward = async move {
            let mut log_rx = log_rx;
            loop {
                tokio::select! {
                    _ = forward_tx.closed() => break,
                    event = log_rx.recv() => match event {
                        Some(event) => {
                            if forward_tx.send(Ok(log_event(&event))).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        };

        let (outcome, ()) = tokio::join!(runs.follow(&job_id, log_tx), forward);
        debug!(job_id = %job_id, outcome = ?outcome, "Log relay finished");

        if outcome != RunOutcome::Detached {
            let _ = tx.send(Ok(outcome_event(&outcome))).await;
        }
    });

    Ok(Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}

fn log_event(event: &LogEvent) -> Event {
    Event::default()
        .json_data(event)
        .unwrap_or_else(|_| Event::default().data(event.render_line()))
}

fn outcome_event(outcome: &RunOutcome) -> Event {
    Event::default()
        .event("outcome")
        .json_data(outcome)
        .unwrap_or_else(|_| Event::default().event("outcome").data("{}"))
}
