//! Run service
//!
//! Submits validated configs to the evaluation backend and relays a job's
//! log stream to a consumer.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::domain::experiment::Validator;
use crate::domain::run::{
    JobId, JobStatusReport, LogEvent, RunBackend, RunHandle, RunOutcome, RunRequest,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_run_submit_failure, record_run_submitted, record_validation,
};

#[derive(Debug)]
pub struct RunService {
    backend: Arc<dyn RunBackend>,
    validator: Validator,
}

impl RunService {
    pub fn new(backend: Arc<dyn RunBackend>, validator: Validator) -> Self {
        Self { backend, validator }
    }

    /// Validates the config, then hands it to the backend
    ///
    /// A backend failure leaves nothing behind; calling again retries.
    #[instrument(skip(self, request), fields(name = ?request.name))]
    pub async fn submit(&self, request: RunRequest) -> Result<RunHandle, DomainError> {
        let report = self.validator.report(&request.config);
        record_validation(report.is_valid);
        if !report.is_valid {
            record_run_submit_failure("invalid");
            return Err(DomainError::validation(report.joined()));
        }

        match self.backend.submit(&request).await {
            Ok(handle) => {
                record_run_submitted();
                info!(job_id = %handle.job_id, "Run submitted");
                Ok(handle)
            }
            Err(e) => {
                record_run_submit_failure("backend");
                warn!(error = %e, "Run submission failed");
                Err(match e {
                    DomainError::Backend { .. } => e,
                    other => DomainError::backend(other.to_string()),
                })
            }
        }
    }

    pub async fn status(&self, job_id: &str) -> Result<JobStatusReport, DomainError> {
        let job_id = JobId::new(job_id)?;
        self.backend.status(&job_id).await
    }

    /// Forwards log events to `sink` until the job ends
    ///
    /// Without a terminal event on the stream the status is polled exactly
    /// once; a failed poll yields [`RunOutcome::Unknown`] rather than
    /// assuming the job failed. Returns [`RunOutcome::Detached`] as soon as
    /// the receiving side is dropped.
    #[instrument(skip(self, sink))]
    pub async fn follow(&self, job_id: &JobId, sink: mpsc::Sender<LogEvent>) -> RunOutcome {
        match self.backend.open_log_stream(job_id).await {
            Ok(mut stream) => loop {
                tokio::select! {
                    _ = sink.closed() => {
                        debug!("Log consumer went away");
                        return RunOutcome::Detached;
                    }
                    item = stream.next() => match item {
                        Some(Ok(event)) => {
                            let outcome = terminal_outcome(&event);
                            if sink.send(event).await.is_err() {
                                return RunOutcome::Detached;
                            }
                            if let Some(outcome) = outcome {
                                info!(outcome = ?outcome, "Job finished");
                                return outcome;
                            }
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "Log stream broke");
                            break;
                        }
                        None => {
                            debug!("Log stream ended without a terminal event");
                            break;
                        }
                    }
                }
            },
            Err(e) => warn!(error = %e, "Failed to open log stream"),
        }

        self.poll_once(job_id).await
    }

    async fn poll_once(&self, job_id: &JobId) -> RunOutcome {
        match self.backend.status(job_id).await {
            Ok(report) => RunOutcome::from_status(report),
            Err(e) => {
                warn!(error = %e, "Status poll failed");
                RunOutcome::Unknown {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn terminal_outcome(event: &LogEvent) -> Option<RunOutcome> {
    match event {
        LogEvent::Complete { result_path, .. } => Some(RunOutcome::Completed {
            result_path: non_blank(result_path),
        }),
        LogEvent::Error { error, .. } => Some(RunOutcome::Failed {
            error: non_blank(error),
        }),
        _ => None,
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
