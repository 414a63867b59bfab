//! Submitter: one creation call per run, never retried

use validator::Validate;
use vidpipe_heygen::VideoApi;

use crate::domain::entities::{GenerationRequest, Job};
use crate::error::FlowError;

pub struct Submitter<'a> {
    api: &'a dyn VideoApi,
}

impl<'a> Submitter<'a> {
    pub fn new(api: &'a dyn VideoApi) -> Self {
        Self { api }
    }

    /// Validate the request and perform exactly one creation call
    pub async fn submit(&self, request: &GenerationRequest) -> Result<Job, FlowError> {
        request
            .validate()
            .map_err(|e| FlowError::InvalidRequest(format!("Validation failed: {}", e)))?;

        let created = self
            .api
            .create_video(&request.to_api_request())
            .await
            .map_err(|source| FlowError::RequestFailure {
                operation: "Create video",
                source,
            })?;

        let video_id = created
            .video_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(FlowError::MissingField("video_id"))?;

        tracing::info!(video_id = %video_id, template_id = %request.template_id, "Video generation submitted");
        Ok(Job::submitted(video_id))
    }
}
