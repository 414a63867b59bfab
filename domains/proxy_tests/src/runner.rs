//! TestRunner: executes the selected smoke cases against a proxy
//!
//! Cases run sequentially in selection order. Each case is isolated: a
//! failure or error is recorded and the next case still runs.
//! `generate-video` remembers the id it created so `check-status` can use it.

use std::sync::Arc;
use std::time::Instant;

use vidpipe_heygen::{CreateVideoRequest, VideoApi};
use vidpipe_videos::JobStatus;

use crate::cases::TestCaseName;
use crate::report::{TestReport, TestResult};

/// Fixed request submitted by `generate-video`
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeFixture {
    pub template_id: String,
    pub voice_id: String,
    pub script_text: String,
}

impl Default for SmokeFixture {
    fn default() -> Self {
        Self {
            template_id: "smoke-test-template".to_string(),
            voice_id: "smoke-test-voice".to_string(),
            script_text: "This is an automated proxy smoke test.".to_string(),
        }
    }
}

impl SmokeFixture {
    /// Override the defaults with `SMOKE_TEMPLATE_ID`, `SMOKE_VOICE_ID`, `SMOKE_SCRIPT_TEXT`
    pub fn from_env() -> Self {
        use vidpipe_common::config::var_or;

        let defaults = Self::default();
        Self {
            template_id: var_or("SMOKE_TEMPLATE_ID", &defaults.template_id),
            voice_id: var_or("SMOKE_VOICE_ID", &defaults.voice_id),
            script_text: var_or("SMOKE_SCRIPT_TEXT", &defaults.script_text),
        }
    }

    fn to_request(&self) -> CreateVideoRequest {
        CreateVideoRequest {
            template_id: self.template_id.clone(),
            voice_id: self.voice_id.clone(),
            script_text: self.script_text.clone(),
        }
    }
}

pub struct TestRunner {
    api: Arc<dyn VideoApi>,
    fixture: SmokeFixture,
}

impl TestRunner {
    pub fn new(api: Arc<dyn VideoApi>, fixture: SmokeFixture) -> Self {
        Self { api, fixture }
    }

    /// Run `cases` in order and aggregate the results
    pub async fn run(&self, cases: &[TestCaseName]) -> TestReport {
        let started_at = chrono::Utc::now();
        let mut generated_id: Option<String> = None;
        let mut results = Vec::with_capacity(cases.len());

        for &case in cases {
            let clock = Instant::now();
            let result = match case {
                TestCaseName::ListTemplates => self.list_templates().await,
                TestCaseName::GenerateVideo => {
                    let (result, id) = self.generate_video().await;
                    if id.is_some() {
                        generated_id = id;
                    }
                    result
                }
                TestCaseName::CheckStatus => self.check_status(generated_id.as_deref()).await,
            }
            .with_duration(clock.elapsed());

            tracing::info!(
                case = %case,
                outcome = ?result.outcome,
                message = result.message.as_deref().unwrap_or_default(),
                "Proxy test case finished"
            );
            results.push(result);
        }

        TestReport::new(results, started_at)
    }

    async fn list_templates(&self) -> TestResult {
        let case = TestCaseName::ListTemplates;
        match self.api.list_templates().await {
            Ok(templates) => TestResult::pass(case, format!("{} templates listed", templates.len())),
            Err(e) => TestResult::error(case, e.to_string()),
        }
    }

    async fn generate_video(&self) -> (TestResult, Option<String>) {
        let case = TestCaseName::GenerateVideo;
        match self.api.create_video(&self.fixture.to_request()).await {
            Ok(created) => match created.video_id.filter(|id| !id.trim().is_empty()) {
                Some(id) => (TestResult::pass(case, format!("video_id={}", id)), Some(id)),
                None => (TestResult::fail(case, "response missing video_id"), None),
            },
            Err(e) => (TestResult::error(case, e.to_string()), None),
        }
    }

    async fn check_status(&self, video_id: Option<&str>) -> TestResult {
        let case = TestCaseName::CheckStatus;
        let Some(video_id) = video_id else {
            return TestResult::error(case, "no video id available: generate-video did not produce one");
        };

        match self.api.video_status(video_id).await {
            Ok(report) => match JobStatus::parse(report.status.as_deref()) {
                JobStatus::Unknown => TestResult::fail(
                    case,
                    format!(
                        "unrecognised status {:?}",
                        report.status.as_deref().unwrap_or_default()
                    ),
                ),
                status => TestResult::pass(case, format!("status={}", status)),
            },
            Err(e) => TestResult::error(case, e.to_string()),
        }
    }
}
