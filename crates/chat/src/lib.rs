//! Vidpipe Chat Notification Service
//!
//! Posts human-readable notifications to chat incoming webhooks:
//! - Webhook delivery over HTTP for production (Slack-compatible payload)
//! - Mock chat service for testing and development
//!
//! The webhook URL is supplied per notification, not per service.

pub mod mock;
pub mod webhook;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat configuration error: {0}")]
    Configuration(String),

    #[error("Chat request error: {0}")]
    Request(String),

    #[error("Chat webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// JSON payload posted to the webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub video_id: String,
    pub video_url: String,
}

impl ChatMessage {
    /// Message announcing a finished video
    pub fn video_ready(video_id: &str, video_url: &str) -> Self {
        Self {
            text: format!(
                ":clapper: Video `{}` is ready: <{}|watch it here>",
                video_id, video_url
            ),
            video_id: video_id.to_string(),
            video_url: video_url.to_string(),
        }
    }
}

/// Chat service configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Chat provider (webhook, mock)
    pub provider: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ChatConfig {
    /// Create chat config from environment variables
    pub fn from_env() -> Result<Self, ChatError> {
        use vidpipe_common::config::{parse_var, var_or};

        Ok(Self {
            provider: var_or("CHAT_PROVIDER", "webhook"),
            timeout_secs: parse_var("CHAT_TIMEOUT_SECS", webhook::DEFAULT_TIMEOUT_SECS)
                .map_err(|e| ChatError::Configuration(e.to_string()))?,
        })
    }
}

/// Chat service trait for different implementations
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Post a message to the given incoming-webhook URL
    async fn post_message(&self, webhook_url: &str, message: &ChatMessage) -> Result<(), ChatError>;
}

/// Factory for creating ChatService implementations
pub struct ChatServiceFactory;

impl ChatServiceFactory {
    pub fn create(config: ChatConfig) -> Result<Box<dyn ChatService>, ChatError> {
        match config.provider.as_str() {
            "webhook" | "slack" => {
                tracing::info!("Creating webhook chat service");
                Ok(Box::new(webhook::WebhookChatService::new(
                    config.timeout_secs,
                )?))
            }
            "mock" => {
                tracing::info!("Creating mock chat service");
                Ok(Box::new(mock::MockChatService::new()))
            }
            provider => Err(ChatError::Configuration(format!(
                "Unknown chat provider: {}. Supported providers: webhook, mock",
                provider
            ))),
        }
    }
}
