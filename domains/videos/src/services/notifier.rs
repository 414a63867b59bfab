//! Notifier: best-effort fan-out to email and chat
//!
//! Email is always attempted. Chat is attempted only when a non-empty
//! webhook URL was supplied; otherwise it is skipped silently. The two
//! sinks run concurrently and neither failure affects the other.

use std::sync::Arc;

use vidpipe_chat::{ChatMessage, ChatService};
use vidpipe_email::EmailService;

use crate::domain::entities::NotificationPayload;

/// Result of delivering to one sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOutcome {
    Delivered,
    Skipped,
    Failed(String),
}

impl SinkOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SinkOutcome::Failed(_))
    }
}

/// Per-sink delivery results
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationReport {
    pub email: SinkOutcome,
    pub chat: SinkOutcome,
}

impl NotificationReport {
    pub fn any_failed(&self) -> bool {
        self.email.is_failed() || self.chat.is_failed()
    }
}

pub struct Notifier {
    email: Arc<dyn EmailService>,
    chat: Arc<dyn ChatService>,
    email_to: String,
}

impl Notifier {
    pub fn new(email: Arc<dyn EmailService>, chat: Arc<dyn ChatService>, email_to: impl Into<String>) -> Self {
        Self {
            email,
            chat,
            email_to: email_to.into(),
        }
    }

    /// Deliver the payload to every configured sink. Never fails.
    pub async fn notify(
        &self,
        payload: &NotificationPayload,
        webhook_url: Option<&str>,
    ) -> NotificationReport {
        let webhook_url = webhook_url.map(str::trim).filter(|url| !url.is_empty());

        let (email, chat) = tokio::join!(
            self.send_email(payload),
            self.send_chat(payload, webhook_url)
        );

        NotificationReport { email, chat }
    }

    async fn send_email(&self, payload: &NotificationPayload) -> SinkOutcome {
        match self
            .email
            .send_video_ready(&self.email_to, &payload.video_id, &payload.video_url)
            .await
        {
            Ok(receipt) => {
                tracing::info!(video_id = %payload.video_id, message_id = %receipt.message_id, "Email notification sent");
                SinkOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(video_id = %payload.video_id, error = %e, "Email notification failed");
                SinkOutcome::Failed(e.to_string())
            }
        }
    }

    async fn send_chat(&self, payload: &NotificationPayload, webhook_url: Option<&str>) -> SinkOutcome {
        let Some(url) = webhook_url else {
            tracing::info!(video_id = %payload.video_id, "No chat webhook URL supplied, skipping chat notification");
            return SinkOutcome::Skipped;
        };

        let message = ChatMessage::video_ready(&payload.video_id, &payload.video_url);
        match self.chat.post_message(url, &message).await {
            Ok(()) => {
                tracing::info!(video_id = %payload.video_id, "Chat notification sent");
                SinkOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(video_id = %payload.video_id, error = %e, "Chat notification failed");
                SinkOutcome::Failed(e.to_string())
            }
        }
    }
}
