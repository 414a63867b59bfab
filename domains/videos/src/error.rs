//! Errors of the video generation flow
//!
//! Every variant here is fatal: the run aborts and reports a non-zero
//! outcome. Notification sink failures are not errors of the flow; they
//! live in [`crate::services::notifier::SinkOutcome`].

use thiserror::Error;
use vidpipe_heygen::HeygenError;

use crate::domain::state::JobStatus;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("{operation} request failed: {source}")]
    RequestFailure {
        operation: &'static str,
        #[source]
        source: HeygenError,
    },

    #[error("Response is missing required field: {0}")]
    MissingField(&'static str),

    #[error("Video {video_id} ended with status '{status}'")]
    TerminalFailure { video_id: String, status: JobStatus },

    #[error("Video {video_id} did not complete after {attempts} status checks")]
    Timeout { video_id: String, attempts: u32 },
}

impl FlowError {
    /// Terminal status to surface as a step output, if the job got that far
    pub fn terminal_status(&self) -> Option<String> {
        match self {
            FlowError::TerminalFailure { status, .. } => Some(status.to_string()),
            FlowError::Timeout { .. } => Some("timeout".to_string()),
            _ => None,
        }
    }

    /// Remote job id, for failures that happen after submission
    pub fn video_id(&self) -> Option<&str> {
        match self {
            FlowError::TerminalFailure { video_id, .. } | FlowError::Timeout { video_id, .. } => {
                Some(video_id)
            }
            _ => None,
        }
    }

    /// Stable error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            FlowError::InvalidRequest(_) => "INVALID_REQUEST",
            FlowError::RequestFailure { .. } => "REQUEST_FAILURE",
            FlowError::MissingField(_) => "MISSING_FIELD",
            FlowError::TerminalFailure { .. } => "TERMINAL_FAILURE",
            FlowError::Timeout { .. } => "TIMEOUT",
        }
    }
}
