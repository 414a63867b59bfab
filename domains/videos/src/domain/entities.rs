//! Domain entities for the video generation flow

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use vidpipe_heygen::{CreateVideoRequest, VideoStatusReport};

use super::state::{JobStateMachine, JobStatus, StateError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// User-supplied generation input. Only presence is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenerationRequest {
    #[validate(custom(function = "not_blank"))]
    pub template_id: String,

    #[validate(custom(function = "not_blank"))]
    pub voice_id: String,

    #[validate(custom(function = "not_blank"))]
    pub script_text: String,
}

impl GenerationRequest {
    pub fn new(
        template_id: impl Into<String>,
        voice_id: impl Into<String>,
        script_text: impl Into<String>,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            voice_id: voice_id.into(),
            script_text: script_text.into(),
        }
    }

    pub fn to_api_request(&self) -> CreateVideoRequest {
        CreateVideoRequest {
            template_id: self.template_id.clone(),
            voice_id: self.voice_id.clone(),
            script_text: self.script_text.clone(),
        }
    }
}

/// A remote video job as last observed
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub video_id: String,
    pub status: JobStatus,
    result_url: Option<String>,
}

impl Job {
    /// A freshly submitted job
    pub fn submitted(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            status: JobStatus::Pending,
            result_url: None,
        }
    }

    /// Record a status report from the remote service
    pub fn observe(&mut self, report: &VideoStatusReport) -> Result<JobStatus, StateError> {
        let observed = JobStatus::parse(report.status.as_deref());
        self.status = JobStateMachine::transition(self.status, observed)?;
        if self.status == JobStatus::Completed {
            self.result_url = report
                .video_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string);
        }
        Ok(self.status)
    }

    /// Result URL; only ever present for a completed job
    pub fn result_url(&self) -> Option<&str> {
        match self.status {
            JobStatus::Completed => self.result_url.as_deref(),
            _ => None,
        }
    }

    /// Notification view of a completed job
    pub fn notification_payload(&self) -> Option<NotificationPayload> {
        self.result_url().map(|url| NotificationPayload {
            video_id: self.video_id.clone(),
            video_url: url.to_string(),
        })
    }
}

/// Read-only view of a completed job sent to notification sinks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub video_id: String,
    pub video_url: String,
}
