//! End-to-end generation flow against a fake video API and chat webhook

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use vidpipe_chat::webhook::{WebhookChatService, DEFAULT_TIMEOUT_SECS};
use vidpipe_email::mock::MockEmailService;
use vidpipe_videos::{
    failure_outputs, FlowError, GenerationPipeline, GenerationRequest, Notifier, PollPolicy,
    RecordingDelay, SinkOutcome,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{status_body, FakeVideoApi};

const RECIPIENT: &str = "releases@example.com";
const VIDEO_URL: &str = "https://cdn.example.com/videos/vid-e2e.mp4";

struct Flow {
    api: FakeVideoApi,
    email: MockEmailService,
    delay: Arc<RecordingDelay>,
    pipeline: GenerationPipeline,
}

async fn flow(policy: PollPolicy) -> Flow {
    let api = FakeVideoApi::start().await;
    let email = MockEmailService::new();
    let delay = Arc::new(RecordingDelay::new());
    let chat = WebhookChatService::new(DEFAULT_TIMEOUT_SECS).unwrap();
    let notifier = Notifier::new(Arc::new(email.clone()), Arc::new(chat), RECIPIENT);
    let pipeline = GenerationPipeline::new(api.client(), delay.clone(), policy, notifier);

    Flow {
        api,
        email,
        delay,
        pipeline,
    }
}

fn request() -> GenerationRequest {
    GenerationRequest::new("tpl-1", "voice-1", "Release 1.4 is out.")
}

#[tokio::test]
async fn test_generation_completes_and_notifies_both_sinks() {
    let f = flow(PollPolicy::default()).await;
    f.api.accept_creation("vid-e2e").await;
    let checks = f
        .api
        .script_statuses(
            "vid-e2e",
            vec![
                status_body("waiting", None),
                status_body("processing", None),
                status_body("completed", Some(VIDEO_URL)),
            ],
        )
        .await;

    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/T000/B000"))
        .and(body_partial_json(json!({"video_id": "vid-e2e", "video_url": VIDEO_URL})))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&webhook)
        .await;
    let webhook_url = format!("{}/services/T000/B000", webhook.uri());

    let outcome = f
        .pipeline
        .run(&request(), Some(&webhook_url))
        .await
        .unwrap();

    assert_eq!(checks.load(Ordering::SeqCst), 3);
    assert_eq!(f.delay.waits(), vec![Duration::from_secs(30); 2]);
    assert_eq!(outcome.notifications.email, SinkOutcome::Delivered);
    assert_eq!(outcome.notifications.chat, SinkOutcome::Delivered);

    let email = f.email.get_latest_video_ready_email(RECIPIENT).unwrap();
    assert_eq!(email.extract_video_id().as_deref(), Some("vid-e2e"));
    assert_eq!(email.extract_video_url().as_deref(), Some(VIDEO_URL));

    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("github_output");
    outcome.step_outputs().append_to(&output_file).unwrap();
    let written = std::fs::read_to_string(&output_file).unwrap();
    assert_eq!(
        written,
        format!("video_id=vid-e2e\nvideo_url={}\nstatus=completed\n", VIDEO_URL)
    );
}

#[tokio::test]
async fn test_creation_body_carries_request_fields() {
    let f = flow(PollPolicy::default()).await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .and(body_partial_json(json!({
            "template_id": "tpl-1",
            "voice_id": "voice-1",
            "script_text": "Release 1.4 is out."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"video_id": "vid-body"})))
        .expect(1)
        .mount(&f.api.server)
        .await;
    f.api
        .script_statuses("vid-body", vec![status_body("completed", Some(VIDEO_URL))])
        .await;

    let outcome = f.pipeline.run(&request(), None).await.unwrap();

    assert_eq!(outcome.job.video_id, "vid-body");
    assert_eq!(outcome.notifications.chat, SinkOutcome::Skipped);
    assert_eq!(f.delay.count(), 0);
}

#[tokio::test]
async fn test_timeout_after_budget_sends_nothing() {
    let f = flow(PollPolicy {
        max_attempts: 4,
        interval: Duration::from_secs(5),
    })
    .await;
    f.api.accept_creation("vid-slow").await;
    let checks = f
        .api
        .script_statuses("vid-slow", vec![status_body("processing", None)])
        .await;

    let err = f.pipeline.run(&request(), None).await.unwrap_err();

    assert!(matches!(err, FlowError::Timeout { attempts: 4, .. }));
    assert_eq!(checks.load(Ordering::SeqCst), 4);
    assert_eq!(f.delay.count(), 4);
    assert_eq!(f.email.email_count(), 0);
    assert_eq!(failure_outputs(&err).get("status"), Some("timeout"));
}

#[tokio::test]
async fn test_remote_failure_stops_polling() {
    let f = flow(PollPolicy::default()).await;
    f.api.accept_creation("vid-bad").await;
    let checks = f
        .api
        .script_statuses(
            "vid-bad",
            vec![
                status_body("processing", None),
                status_body("failed", None),
                status_body("completed", Some(VIDEO_URL)),
            ],
        )
        .await;

    let err = f.pipeline.run(&request(), None).await.unwrap_err();

    assert_eq!(err.terminal_status().as_deref(), Some("failed"));
    assert_eq!(checks.load(Ordering::SeqCst), 2);
    assert_eq!(f.email.email_count(), 0);
}

#[tokio::test]
async fn test_rejected_creation_is_request_failure() {
    let f = flow(PollPolicy::default()).await;
    f.api.reject_creation(401).await;

    let err = f.pipeline.run(&request(), None).await.unwrap_err();

    assert!(matches!(err, FlowError::RequestFailure { .. }));
    assert_eq!(failure_outputs(&err).get("error"), Some("REQUEST_FAILURE"));
}

#[tokio::test]
async fn test_creation_without_id_is_missing_field() {
    let f = flow(PollPolicy::default()).await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&f.api.server)
        .await;

    let err = f.pipeline.run(&request(), None).await.unwrap_err();

    assert!(matches!(err, FlowError::MissingField("video_id")));
}

#[tokio::test]
async fn test_chat_webhook_failure_is_not_fatal() {
    let f = flow(PollPolicy::default()).await;
    f.api.accept_creation("vid-chat").await;
    f.api
        .script_statuses("vid-chat", vec![status_body("completed", Some(VIDEO_URL))])
        .await;

    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
        .mount(&webhook)
        .await;

    let outcome = f
        .pipeline
        .run(&request(), Some(&webhook.uri()))
        .await
        .unwrap();

    assert!(outcome.notifications.chat.is_failed());
    assert_eq!(outcome.notifications.email, SinkOutcome::Delivered);
}

#[tokio::test]
async fn test_numeric_video_id_is_polled_as_text() {
    let f = flow(PollPolicy::default()).await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"video_id": 12345}})))
        .mount(&f.api.server)
        .await;
    let checks = f
        .api
        .script_statuses("12345", vec![status_body("completed", Some(VIDEO_URL))])
        .await;

    let outcome = f.pipeline.run(&request(), None).await.unwrap();

    assert_eq!(outcome.job.video_id, "12345");
    assert_eq!(checks.load(Ordering::SeqCst), 1);
}
