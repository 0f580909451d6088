//! Run submission and job status types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::experiment::ExperimentConfig;
use crate::domain::DomainError;

// ============================================================================
// JobId
// ============================================================================

/// Identifier assigned by the evaluation backend to a submitted run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Job ids end up in URL paths, so only `[A-Za-z0-9_-]` is accepted
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::invalid_id("Job ID cannot be empty"));
        }
        if let Some(ch) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DomainError::invalid_id(format!(
                "Job ID contains invalid character: '{}'",
                ch
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Submission
// ============================================================================

/// Payload accepted by the run backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub config: ExperimentConfig,
}

impl RunRequest {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            id: None,
            name: None,
            config,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub job_id: JobId,
}

// ============================================================================
// JobStatus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Answer of the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// RunOutcome
// ============================================================================

/// What following a job's logs concluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed {
        #[serde(skip_serializing_if = "Option::is_none")]
        result_path: Option<String>,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Stream ended but the backend still reports the job as in progress
    InProgress { status: JobStatus },
    /// Neither the stream nor the status poll gave an answer
    Unknown { reason: String },
    /// The consumer went away before the job finished
    Detached,
}

impl RunOutcome {
    pub fn from_status(report: JobStatusReport) -> Self {
        match report.status {
            JobStatus::Completed => Self::Completed {
                result_path: report.result_path,
            },
            JobStatus::Failed => Self::Failed {
                error: report.error,
            },
            status => Self::InProgress { status },
        }
    }
}
