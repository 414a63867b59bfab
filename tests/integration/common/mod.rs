//! Common test utilities for integration tests
//!
//! - A fake video API served by wiremock, with scripted status sequences
//! - Real HTTP clients pointed at it
//! - Tracing setup shared by every test binary

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use serde_json::{json, Value};
use vidpipe_heygen::{HeygenConfig, VideoApi, VideoApiFactory};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const API_TOKEN: &str = "integration-token";

static INIT: Once = Once::new();

/// Install a test-friendly subscriber once per test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Answers with each body in turn, repeating the last one when exhausted
pub struct StatusSequence {
    bodies: Vec<Value>,
    served: Arc<AtomicUsize>,
}

impl StatusSequence {
    pub fn new(bodies: Vec<Value>) -> Self {
        assert!(!bodies.is_empty(), "status sequence needs at least one body");
        Self {
            bodies,
            served: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of requests answered so far
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.served.clone()
    }
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.served.fetch_add(1, Ordering::SeqCst);
        let body = self
            .bodies
            .get(index)
            .or_else(|| self.bodies.last())
            .cloned()
            .unwrap_or(Value::Null);
        ResponseTemplate::new(200).set_body_json(body)
    }
}

/// Status body in the `data` envelope
pub fn status_body(status: &str, video_url: Option<&str>) -> Value {
    match video_url {
        Some(url) => json!({"data": {"status": status, "video_url": url}}),
        None => json!({"data": {"status": status}}),
    }
}

/// Wiremock server standing in for the video API (or the proxy in front of it)
pub struct FakeVideoApi {
    pub server: MockServer,
}

impl FakeVideoApi {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Real HTTP client for this server
    pub fn client(&self) -> Arc<dyn VideoApi> {
        let api = VideoApiFactory::create(HeygenConfig::for_endpoint(self.uri(), API_TOKEN))
            .expect("heygen provider builds with a token");
        Arc::from(api)
    }

    pub async fn accept_creation(&self, video_id: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .and(header("authorization", format!("Bearer {}", API_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"video_id": video_id}})))
            .mount(&self.server)
            .await;
    }

    pub async fn reject_creation(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .respond_with(ResponseTemplate::new(status).set_body_string("rejected"))
            .mount(&self.server)
            .await;
    }

    /// Serve `bodies` in order for status checks of `video_id`
    pub async fn script_statuses(&self, video_id: &str, bodies: Vec<Value>) -> Arc<AtomicUsize> {
        let sequence = StatusSequence::new(bodies);
        let counter = sequence.counter();
        Mock::given(method("GET"))
            .and(path(format!("/v1/videos/{}/status", video_id)))
            .respond_with(sequence)
            .mount(&self.server)
            .await;
        counter
    }

    pub async fn serve_templates(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/v2/templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn serve_videos(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/v1/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn fail_path(&self, http_method: &str, route: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
            .mount(&self.server)
            .await;
    }
}
