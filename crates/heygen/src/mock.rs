//! Mock Video API Implementation
//!
//! Programmable mock for testing generation and polling flows:
//! - `MockVideoApi`: scripted responses with request recording
//! - `MockCreateResponse`: assign an id, omit it, or reject the request
//! - `MockStatus`: one scripted answer to a status query

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use crate::{
    CreateVideoRequest, CreatedVideo, HeygenError, Template, VideoApi, VideoRecord,
    VideoStatusReport,
};

/// How the mock answers `create_video`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockCreateResponse {
    /// Assign a fresh `mock-<uuid>` id
    #[default]
    Assign,
    /// Assign this exact id
    AssignId(String),
    /// Succeed without an id
    MissingId,
    /// Answer with a non-success HTTP status
    Reject(u16),
}

/// One scripted answer to `video_status`
#[derive(Debug, Clone, PartialEq)]
pub enum MockStatus {
    Report(VideoStatusReport),
    Reject(u16),
}

impl MockStatus {
    pub fn status(status: &str) -> Self {
        Self::Report(VideoStatusReport::new(status))
    }

    pub fn completed(url: &str) -> Self {
        Self::Report(VideoStatusReport::new("completed").with_video_url(url))
    }
}

/// Mock video API with scripted behavior.
///
/// Status answers are consumed in order; once the script runs out every
/// query reports `processing`.
#[derive(Debug, Clone, Default)]
pub struct MockVideoApi {
    create_response: Arc<RwLock<MockCreateResponse>>,
    statuses: Arc<Mutex<VecDeque<MockStatus>>>,
    videos: Arc<RwLock<Vec<VideoRecord>>>,
    templates: Arc<RwLock<Vec<Template>>>,
    list_rejection: Arc<RwLock<Option<u16>>>,
    created: Arc<Mutex<Vec<CreateVideoRequest>>>,
    status_queries: Arc<Mutex<Vec<String>>>,
}

impl MockVideoApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mock that answers status queries with `statuses` in order
    pub fn with_statuses(statuses: Vec<MockStatus>) -> Self {
        let mock = Self::new();
        mock.set_statuses(statuses);
        mock
    }

    pub fn set_create_response(&self, response: MockCreateResponse) {
        *self.create_response.write().unwrap() = response;
    }

    pub fn set_statuses(&self, statuses: Vec<MockStatus>) {
        *self.statuses.lock().unwrap() = statuses.into();
    }

    pub fn set_videos(&self, videos: Vec<VideoRecord>) {
        *self.videos.write().unwrap() = videos;
    }

    pub fn set_templates(&self, templates: Vec<Template>) {
        *self.templates.write().unwrap() = templates;
    }

    /// Make both listing endpoints answer with a non-success status
    pub fn reject_listings(&self, status: u16) {
        *self.list_rejection.write().unwrap() = Some(status);
    }

    /// Recorded creation requests
    pub fn created_requests(&self) -> Vec<CreateVideoRequest> {
        self.created.lock().unwrap().clone()
    }

    /// Video ids passed to `video_status`, in call order
    pub fn status_queries(&self) -> Vec<String> {
        self.status_queries.lock().unwrap().clone()
    }

    pub fn status_query_count(&self) -> usize {
        self.status_queries.lock().unwrap().len()
    }

    fn rejected(status: u16) -> HeygenError {
        HeygenError::Response {
            status,
            message: "Mock video API rejection".to_string(),
        }
    }

    fn check_listing(&self) -> Result<(), HeygenError> {
        match *self.list_rejection.read().unwrap() {
            Some(status) => Err(Self::rejected(status)),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl VideoApi for MockVideoApi {
    async fn create_video(&self, request: &CreateVideoRequest) -> Result<CreatedVideo, HeygenError> {
        tracing::info!(template_id = %request.template_id, "Mock video API: received create request");
        self.created.lock().unwrap().push(request.clone());

        let response = self.create_response.read().unwrap().clone();
        match response {
            MockCreateResponse::Assign => Ok(CreatedVideo {
                video_id: Some(format!("mock-{}", uuid::Uuid::new_v4())),
            }),
            MockCreateResponse::AssignId(id) => Ok(CreatedVideo { video_id: Some(id) }),
            MockCreateResponse::MissingId => Ok(CreatedVideo { video_id: None }),
            MockCreateResponse::Reject(status) => Err(Self::rejected(status)),
        }
    }

    async fn video_status(&self, video_id: &str) -> Result<VideoStatusReport, HeygenError> {
        self.status_queries
            .lock()
            .unwrap()
            .push(video_id.to_string());

        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(MockStatus::Report(report)) => Ok(report),
            Some(MockStatus::Reject(status)) => Err(Self::rejected(status)),
            None => Ok(VideoStatusReport::new("processing")),
        }
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>, HeygenError> {
        self.check_listing()?;
        Ok(self.videos.read().unwrap().clone())
    }

    async fn list_templates(&self) -> Result<Vec<Template>, HeygenError> {
        self.check_listing()?;
        Ok(self.templates.read().unwrap().clone())
    }
}
