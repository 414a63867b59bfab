//! Poller: bounded status polling with a fixed delay
//!
//! After every non-terminal status the poller sleeps once, including after
//! the last attempt, so a timeout costs exactly `max_attempts` fetches and
//! `max_attempts` delays.

use std::sync::Mutex;
use std::time::Duration;

use vidpipe_heygen::VideoApi;

use crate::domain::entities::Job;
use crate::domain::state::JobStatus;
use crate::error::FlowError;

/// Default number of status checks
pub const DEFAULT_MAX_ATTEMPTS: u32 = 12;

/// Default delay between status checks
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Attempt budget and delay for one polling run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollPolicy {
    /// Read `POLL_MAX_ATTEMPTS` and `POLL_INTERVAL_SECS`, defaulting to 12 × 30 s
    pub fn from_env() -> vidpipe_common::Result<Self> {
        use vidpipe_common::config::parse_var;

        let max_attempts = parse_var("POLL_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(vidpipe_common::Error::Configuration(
                "POLL_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        let interval_secs = parse_var("POLL_INTERVAL_SECS", DEFAULT_INTERVAL.as_secs())?;

        Ok(Self {
            max_attempts,
            interval: Duration::from_secs(interval_secs),
        })
    }
}

/// The wait between two status checks
#[async_trait::async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer
pub struct TokioDelay;

#[async_trait::async_trait]
impl Delay for TokioDelay {
    #[mutants::skip] // Real sleep; tests inject RecordingDelay
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays without sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.waits.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub struct Poller<'a> {
    api: &'a dyn VideoApi,
    delay: &'a dyn Delay,
    policy: PollPolicy,
}

impl<'a> Poller<'a> {
    pub fn new(api: &'a dyn VideoApi, delay: &'a dyn Delay, policy: PollPolicy) -> Self {
        Self { api, delay, policy }
    }

    /// Poll until the job completes, fails, or the budget runs out.
    ///
    /// Returns the completed job, which always carries a result URL.
    pub async fn wait_for_completion(&self, mut job: Job) -> Result<Job, FlowError> {
        for attempt in 1..=self.policy.max_attempts {
            let report = self
                .api
                .video_status(&job.video_id)
                .await
                .map_err(|source| FlowError::RequestFailure {
                    operation: "Status check",
                    source,
                })?;

            let status = job.observe(&report).map_err(|e| {
                tracing::error!(video_id = %job.video_id, error = %e, "Status observed after terminal state");
                FlowError::TerminalFailure {
                    video_id: job.video_id.clone(),
                    status: job.status,
                }
            })?;

            tracing::info!(
                video_id = %job.video_id,
                attempt,
                max_attempts = self.policy.max_attempts,
                status = %status,
                "Video status checked"
            );

            match status {
                JobStatus::Completed => {
                    if job.result_url().is_none() {
                        return Err(FlowError::MissingField("video_url"));
                    }
                    return Ok(job);
                }
                JobStatus::Failed | JobStatus::Error => {
                    return Err(FlowError::TerminalFailure {
                        video_id: job.video_id,
                        status,
                    });
                }
                JobStatus::Pending | JobStatus::Processing | JobStatus::Unknown => {
                    self.delay.wait(self.policy.interval).await;
                }
            }
        }

        tracing::warn!(video_id = %job.video_id, attempts = self.policy.max_attempts, "Video polling budget exhausted");
        Err(FlowError::Timeout {
            video_id: job.video_id,
            attempts: self.policy.max_attempts,
        })
    }
}
