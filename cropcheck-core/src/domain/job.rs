//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::sample::Sample;

/// One submitted unit of remote work
///
/// Created once the service hands back an id and owned by the runner's
/// registry until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct Job {
    /// Opaque identifier assigned by the service
    pub id: String,
    /// Sample this job was submitted for
    pub sample: Sample,
    pub state: JobState,
    pub submitted_at: DateTime<Utc>,
    /// Consecutive polls that failed at the transport or HTTP level
    pub poll_failures: u32,
}

impl Job {
    pub fn new(id: impl Into<String>, sample: Sample) -> Self {
        Self {
            id: id.into(),
            sample,
            state: JobState::Pending,
            submitted_at: Utc::now(),
            poll_failures: 0,
        }
    }
}

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Service answered with a status we do not recognize; keep polling
    Unknown,
    /// Gave up after too many consecutive poll failures
    Abandoned,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Abandoned
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Processing => write!(f, "processing"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
            JobState::Unknown => write!(f, "unknown"),
            JobState::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Status label reported by the service for a job without a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLabel {
    Pending,
    Processing,
    Failed,
    /// Anything else, including a missing label; carries the raw value
    Unknown(String),
}

impl StatusLabel {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("pending") => StatusLabel::Pending,
            Some("processing") => StatusLabel::Processing,
            Some("failed") => StatusLabel::Failed,
            Some(other) => StatusLabel::Unknown(other.to_string()),
            None => StatusLabel::Unknown("unknown".to_string()),
        }
    }

    /// The job state this label moves a job into
    pub fn state(&self) -> JobState {
        match self {
            StatusLabel::Pending => JobState::Pending,
            StatusLabel::Processing => JobState::Processing,
            StatusLabel::Failed => JobState::Failed,
            StatusLabel::Unknown(_) => JobState::Unknown,
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLabel::Pending => write!(f, "pending"),
            StatusLabel::Processing => write!(f, "processing"),
            StatusLabel::Failed => write!(f, "failed"),
            StatusLabel::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Decoded answer to a single status poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSnapshot {
    /// Terminal success with the decoded result artifact
    Completed(Vec<u8>),
    Status(StatusLabel),
}

impl JobSnapshot {
    pub fn state(&self) -> JobState {
        match self {
            JobSnapshot::Completed(_) => JobState::Completed,
            JobSnapshot::Status(label) => label.state(),
        }
    }
}
