//! Vidpipe Email Service
//!
//! Provides email functionality for video notifications with support for:
//! - SMTP delivery for production (STARTTLS relay or plain local relay)
//! - Mock email service for testing and development
//! - Video-ready notification content

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod content;
pub mod mock;
pub mod smtp;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("Email template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            reply_to: None,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Reject obviously malformed addresses before handing off to a transport
    pub fn validate_addresses(&self) -> Result<(), EmailError> {
        if !self.to.contains('@') || !self.from.contains('@') {
            return Err(EmailError::Validation(
                "Invalid email address format".to_string(),
            ));
        }
        Ok(())
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Email service configuration
#[derive(Clone)]
pub struct EmailConfig {
    /// Email service provider (smtp, mock)
    pub provider: String,
    /// SMTP relay hostname
    pub smtp_host: Option<String>,
    /// SMTP relay port
    pub smtp_port: u16,
    /// Optional SMTP username
    pub smtp_user: Option<String>,
    /// Optional SMTP password
    pub smtp_password: Option<String>,
    /// Use STARTTLS; disable only for local relays
    pub smtp_starttls: bool,
    /// Default from address
    pub default_from: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("provider", &self.provider)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field(
                "smtp_password",
                &self.smtp_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("smtp_starttls", &self.smtp_starttls)
            .field("default_from", &self.default_from)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Default SMTP port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set
pub const DEFAULT_FROM_ADDRESS: &str = "notifications@vidpipe.dev";

impl EmailConfig {
    /// Create email config from environment variables.
    ///
    /// The provider defaults to `smtp` when `SMTP_HOST` is set and to `mock`
    /// otherwise.
    pub fn from_env() -> Result<Self, EmailError> {
        use vidpipe_common::config::{optional_var, parse_var, var_or};

        let smtp_host = optional_var("SMTP_HOST");
        let default_provider = if smtp_host.is_some() { "smtp" } else { "mock" };
        let provider = var_or("EMAIL_PROVIDER", default_provider);

        let smtp_port = parse_var("SMTP_PORT", DEFAULT_SMTP_PORT)
            .map_err(|e| EmailError::Configuration(e.to_string()))?;
        let smtp_starttls = parse_var("SMTP_STARTTLS", true)
            .map_err(|e| EmailError::Configuration(e.to_string()))?;
        let enabled = parse_var("EMAIL_ENABLED", true)
            .map_err(|e| EmailError::Configuration(e.to_string()))?;

        Ok(Self {
            provider,
            smtp_host,
            smtp_port,
            smtp_user: optional_var("SMTP_USER"),
            smtp_password: optional_var("SMTP_PASSWORD"),
            smtp_starttls,
            default_from: var_or("SMTP_FROM", DEFAULT_FROM_ADDRESS),
            enabled,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Send the "video ready" notification
    async fn send_video_ready(
        &self,
        recipient_email: &str,
        video_id: &str,
        video_url: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            content::video_ready_subject(video_id),
            content::video_ready_text(video_id, video_url),
        )
        .with_html(content::video_ready_html(video_id, video_url)?)
        .with_metadata("email_type".to_string(), "video_ready".to_string())
        .with_metadata("video_id".to_string(), video_id.to_string());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(Box::new(mock::MockEmailService::new_disabled()));
        }

        match config.provider.as_str() {
            "smtp" => {
                tracing::info!("Creating SMTP email service");
                Ok(Box::new(smtp::SmtpEmailService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::new()))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: smtp, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn smtp_config() -> EmailConfig {
        EmailConfig {
            provider: "smtp".to_string(),
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_user: Some("mailer".to_string()),
            smtp_password: Some("hunter2".to_string()),
            smtp_starttls: true,
            default_from: DEFAULT_FROM_ADDRESS.to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_email_message_creation() {
        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@example.com".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        )
        .with_html("<p>Test body</p>".to_string())
        .with_reply_to("reply@example.com".to_string())
        .with_metadata("video_id".to_string(), "123".to_string());

        assert_eq!(message.to, "test@example.com");
        assert_eq!(message.subject, "Test Subject");
        assert_eq!(message.body_html, Some("<p>Test body</p>".to_string()));
        assert_eq!(message.reply_to, Some("reply@example.com".to_string()));
        assert_eq!(message.metadata.get("video_id"), Some(&"123".to_string()));
        assert!(message.validate_addresses().is_ok());
    }

    #[test]
    fn test_validate_addresses_rejects_blank_recipient() {
        let message = EmailMessage::new(
            String::new(),
            "sender@example.com".to_string(),
            "s".to_string(),
            "b".to_string(),
        );
        assert!(matches!(
            message.validate_addresses(),
            Err(EmailError::Validation(_))
        ));
    }

    #[test]
    #[serial]
    fn test_email_config_from_env_defaults() {
        std::env::remove_var("EMAIL_PROVIDER");
        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_FROM");
        std::env::remove_var("SMTP_PORT");
        std::env::remove_var("EMAIL_ENABLED");

        let config = EmailConfig::from_env().unwrap();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.default_from, DEFAULT_FROM_ADDRESS);
        assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
        assert!(config.enabled);
    }

    #[test]
    #[serial]
    fn test_email_config_smtp_when_host_set() {
        std::env::remove_var("EMAIL_PROVIDER");
        std::env::set_var("SMTP_HOST", "smtp.example.com");
        std::env::set_var("SMTP_PORT", "2525");

        let config = EmailConfig::from_env().unwrap();
        assert_eq!(config.provider, "smtp");
        assert_eq!(config.smtp_port, 2525);

        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let debug = format!("{:?}", smtp_config());
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_factory_unknown_provider() {
        let mut config = smtp_config();
        config.provider = "carrier-pigeon".to_string();
        let err = match EmailServiceFactory::create(config) {
            Err(e) => e,
            Ok(_) => panic!("Expected error"),
        };
        assert!(err
            .to_string()
            .contains("Unknown email provider: carrier-pigeon"));
    }

    #[test]
    fn test_factory_smtp_requires_host() {
        let mut config = smtp_config();
        config.smtp_host = None;
        assert!(matches!(
            EmailServiceFactory::create(config),
            Err(EmailError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_factory_smtp_builds_without_connecting() {
        assert!(EmailServiceFactory::create(smtp_config()).is_ok());
    }
}
