//! Mock Chat Service Implementation
//!
//! Records posted messages for test assertions; can be told to fail.

use std::sync::{Arc, Mutex};

use crate::{ChatError, ChatMessage, ChatService};

/// A recorded webhook post
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPost {
    pub webhook_url: String,
    pub message: ChatMessage,
}

/// Mock chat service that records posts
#[derive(Debug, Clone, Default)]
pub struct MockChatService {
    posts: Arc<Mutex<Vec<RecordedPost>>>,
    failure_status: Arc<Mutex<Option<u16>>>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every subsequent post with this HTTP status
    pub fn fail_with_status(&self, status: u16) {
        *self.failure_status.lock().unwrap() = Some(status);
    }

    pub fn recorded_posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ChatService for MockChatService {
    async fn post_message(&self, webhook_url: &str, message: &ChatMessage) -> Result<(), ChatError> {
        tracing::debug!(webhook_url, "Mock chat: recording post");
        self.posts.lock().unwrap().push(RecordedPost {
            webhook_url: webhook_url.to_string(),
            message: message.clone(),
        });

        let failure = *self.failure_status.lock().unwrap();
        match failure {
            Some(status) => Err(ChatError::HttpStatus(status)),
            None => Ok(()),
        }
    }
}
