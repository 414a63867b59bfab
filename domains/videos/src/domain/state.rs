//! State machine for remote video jobs
//!
//! The remote service owns the job; locally we only observe its status.
//! Observations are accepted in any order while the job is live, but once
//! a terminal status has been seen nothing may move the job again.

pub use vidpipe_common::StateError;

/// Job status as reported by the remote video API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Error,
    Unknown,
}

impl JobStatus {
    /// Parse a remote status string. Unrecognised or absent values map to `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("pending") | Some("waiting") => Self::Pending,
            Some("processing") => Self::Processing,
            Some("completed") => Self::Completed,
            Some("failed") => Self::Failed,
            Some("error") => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }

    /// Terminal states reached through a remote failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }

}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Error => write!(f, "error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Job state machine
pub struct JobStateMachine;

impl JobStateMachine {
    /// Apply an observed status to the current one.
    ///
    /// A live job takes whatever the remote reports; a terminal job takes nothing.
    pub fn transition(current: JobStatus, observed: JobStatus) -> Result<JobStatus, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        Ok(observed)
    }
}
