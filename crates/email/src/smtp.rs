//! SMTP Email Service Implementation
//!
//! Delivers mail through an SMTP relay using the `lettre` async transport.
//! STARTTLS is used unless explicitly disabled for a local relay.

use chrono::Utc;
use lettre::message::{header::ContentType, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

/// SMTP email service implementation
pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl SmtpEmailService {
    /// Create a new SMTP email service. No connection is made until the first send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let host = config.smtp_host.clone().ok_or_else(|| {
            EmailError::Configuration("SMTP_HOST is required for the smtp provider".to_string())
        })?;

        let mut builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                .map_err(|e| EmailError::Configuration(format!("Invalid SMTP relay: {}", e)))?
        } else {
            tracing::warn!(host = %host, "SMTP STARTTLS disabled, sending in plain text");
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host)
        };
        builder = builder.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            config,
        })
    }

    /// Convert an email message to a MIME message
    fn build_mime_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| EmailError::Validation(format!("Invalid from address: {}", e)))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| EmailError::Validation(format!("Invalid recipient address: {}", e)))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());

        if let Some(reply_to) = &message.reply_to {
            let reply_to: Mailbox = reply_to
                .parse()
                .map_err(|e| EmailError::Validation(format!("Invalid reply-to address: {}", e)))?;
            builder = builder.reply_to(reply_to);
        }

        let built = match &message.body_html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.body_text.clone(),
                html.clone(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.body_text.clone()),
        };

        built.map_err(|e| EmailError::Smtp(format!("Failed to build message: {}", e)))
    }
}

#[async_trait::async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(to = %message.to, "Sending email via SMTP");

        message.validate_addresses()?;
        let mime = self.build_mime_message(&message)?;

        let response = self
            .mailer
            .send(mime)
            .await
            .map_err(|e| EmailError::Smtp(format!("Failed to send email: {}", e)))?;

        let message_id = response
            .message()
            .next()
            .map(|line| line.to_string())
            .unwrap_or_else(|| format!("smtp-{}", Uuid::new_v4()));

        tracing::info!(message_id = %message_id, "Email sent successfully via SMTP");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "smtp".to_string(),
            metadata: message.metadata.clone(),
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }
}
