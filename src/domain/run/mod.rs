//! Run domain - submitting experiments and following their jobs

mod backend;
mod entity;
mod log_event;

pub use backend::{LogStream, RunBackend};
pub use entity::{JobId, JobStatus, JobStatusReport, RunHandle, RunOutcome, RunRequest};
pub use log_event::{transcript, LogEvent};

#[cfg(test)]
pub use backend::MockRunBackend;
