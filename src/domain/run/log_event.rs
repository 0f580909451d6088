//! Events pushed on a job's log stream

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Only `type` is required: a missing timestamp is stamped on arrival and
/// other missing fields are blank, so a known terminal type always ends the
/// stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    Log {
        #[serde(default = "now")]
        timestamp: String,
        #[serde(default)]
        message: String,
    },
    Complete {
        #[serde(default = "now")]
        timestamp: String,
        #[serde(default)]
        result_path: String,
    },
    Error {
        #[serde(default = "now")]
        timestamp: String,
        #[serde(default)]
        error: String,
    },
    Heartbeat {
        #[serde(default = "now")]
        ts: String,
    },
}

impl LogEvent {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            timestamp: now(),
            message: message.into(),
        }
    }

    /// Decodes one stream payload; anything that is not a known event is
    /// kept as a log line stamped with the current time
    pub fn from_payload(data: &str) -> Self {
        serde_json::from_str(data).unwrap_or_else(|_| Self::log(data))
    }

    /// `complete` and `error` end the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// One line of the plain-text transcript
    pub fn render_line(&self) -> String {
        match self {
            Self::Log { timestamp, message } => format!("[{}] {}", timestamp, message),
            Self::Complete {
                timestamp,
                result_path,
            } => format!("[{}] ✅ complete: {}", timestamp, result_path),
            Self::Error { timestamp, error } => format!("[{}] ❌ error: {}", timestamp, error),
            Self::Heartbeat { ts } => format!("[{}] …", ts),
        }
    }
}

/// Full transcript, one event per line
pub fn transcript<'a>(events: impl IntoIterator<Item = &'a LogEvent>) -> String {
    events
        .into_iter()
        .map(LogEvent::render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
