//! Generation pipeline: Submitter → Poller → Notifier
//!
//! Strictly sequential. Any [`FlowError`] aborts the run before
//! notifications are sent; notification failures never abort it.

use std::sync::Arc;

use vidpipe_common::StepOutputs;
use vidpipe_heygen::VideoApi;

use super::notifier::{NotificationReport, Notifier};
use super::poller::{Delay, PollPolicy, Poller};
use super::submitter::Submitter;
use crate::domain::entities::{GenerationRequest, Job};
use crate::error::FlowError;

/// Successful end of a generation run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub job: Job,
    pub notifications: NotificationReport,
}

impl GenerationOutcome {
    /// `video_id`, `video_url` and `status` for downstream steps
    pub fn step_outputs(&self) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs
            .set("video_id", self.job.video_id.as_str())
            .set("video_url", self.job.result_url().unwrap_or_default())
            .set("status", self.job.status.to_string());
        outputs
    }
}

/// Outputs for a failed run: terminal status where known, and the error code
pub fn failure_outputs(error: &FlowError) -> StepOutputs {
    let mut outputs = StepOutputs::new();
    if let Some(video_id) = error.video_id() {
        outputs.set("video_id", video_id);
    }
    if let Some(status) = error.terminal_status() {
        outputs.set("status", status);
    }
    outputs.set("error", error.error_code());
    outputs
}

pub struct GenerationPipeline {
    api: Arc<dyn VideoApi>,
    delay: Arc<dyn Delay>,
    policy: PollPolicy,
    notifier: Notifier,
}

impl GenerationPipeline {
    pub fn new(
        api: Arc<dyn VideoApi>,
        delay: Arc<dyn Delay>,
        policy: PollPolicy,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            delay,
            policy,
            notifier,
        }
    }

    pub async fn run(
        &self,
        request: &GenerationRequest,
        webhook_url: Option<&str>,
    ) -> Result<GenerationOutcome, FlowError> {
        let job = Submitter::new(self.api.as_ref()).submit(request).await?;

        let job = Poller::new(self.api.as_ref(), self.delay.as_ref(), self.policy)
            .wait_for_completion(job)
            .await?;

        let payload = job
            .notification_payload()
            .ok_or(FlowError::MissingField("video_url"))?;
        let notifications = self.notifier.notify(&payload, webhook_url).await;
        if notifications.any_failed() {
            tracing::warn!(video_id = %job.video_id, "Some notifications could not be delivered");
        }

        tracing::info!(video_id = %job.video_id, video_url = %payload.video_url, "Video generation completed");
        Ok(GenerationOutcome { job, notifications })
    }
}
