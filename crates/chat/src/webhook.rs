//! Incoming-webhook delivery
//!
//! [`WebhookChatService`] sends a JSON-encoded [`ChatMessage`] to the
//! webhook URL via HTTP POST. There is no retry: a failed post is reported
//! to the caller, which treats chat delivery as best-effort.

use std::time::Duration;

use crate::{ChatError, ChatMessage, ChatService};

/// HTTP request timeout for a single delivery attempt
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Delivers chat messages to incoming-webhook endpoints
pub struct WebhookChatService {
    client: reqwest::Client,
}

impl WebhookChatService {
    pub fn new(timeout_secs: u64) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ChatService for WebhookChatService {
    async fn post_message(&self, webhook_url: &str, message: &ChatMessage) -> Result<(), ChatError> {
        let response = self
            .client
            .post(webhook_url)
            .json(message)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpStatus(status.as_u16()));
        }

        tracing::debug!(video_id = %message.video_id, "Chat webhook accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_posts_json_payload() {
        let server = MockServer::start().await;
        let message = ChatMessage::video_ready("vid-1", "https://x/video.mp4");

        Mock::given(method("POST"))
            .and(path("/hooks/abc"))
            .and(body_json(serde_json::to_value(&message).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let service = WebhookChatService::new(DEFAULT_TIMEOUT_SECS).unwrap();
        service
            .post_message(&format!("{}/hooks/abc", server.uri()), &message)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_success_is_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(410).set_body_string("no_service"))
            .mount(&server)
            .await;

        let service = WebhookChatService::new(DEFAULT_TIMEOUT_SECS).unwrap();
        let err = service
            .post_message(
                &server.uri(),
                &ChatMessage::video_ready("vid", "https://x"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::HttpStatus(410)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let service = WebhookChatService::new(1).unwrap();
        let err = service
            .post_message(
                "http://127.0.0.1:9/hook",
                &ChatMessage::video_ready("vid", "https://x"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Request(_)));
    }
}
