// File: src/mail.rs
// Purpose: Composing and delivering quote request emails

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::MailConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

/// The validated contents of one contact form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    /// Optional, may be empty
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl QuoteRequest {
    pub fn subject(&self) -> String {
        format!("New Quote Request — {}", self.service)
    }

    /// Plain-text body, stamped with `received_at`
    pub fn body(&self, received_at: DateTime<Utc>) -> String {
        let phone = if self.phone.is_empty() { "—" } else { &self.phone };
        format!(
            "Time (UTC): {}Z\nName: {}\nEmail: {}\nPhone: {}\nService: {}\n\nMessage:\n{}\n",
            received_at.format("%Y-%m-%dT%H:%M:%S%.6f"),
            self.name,
            self.email,
            phone,
            self.service,
            self.message,
        )
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("{0}")]
    Message(#[from] lettre::error::Error),

    #[error("{0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Delivers quote requests
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, request: &QuoteRequest) -> Result<(), MailError>;
}

/// [`Mailer`] over authenticated SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = if config.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            transport,
            from: config.user.parse()?,
            to: config.to.parse()?,
        })
    }

    /// Build the email; replies go to the requester when their address parses
    pub fn compose(&self, request: &QuoteRequest, received_at: DateTime<Utc>) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(request.subject())
            .header(ContentType::TEXT_PLAIN);

        match request.email.parse::<Mailbox>() {
            Ok(reply_to) => builder = builder.reply_to(reply_to),
            Err(e) => tracing::debug!("Not setting Reply-To for '{}': {}", request.email, e),
        }

        Ok(builder.body(request.body(received_at))?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, request: &QuoteRequest) -> Result<(), MailError> {
        let message = self.compose(request, Utc::now())?;
        self.transport.send(message).await?;
        tracing::info!("Quote request for '{}' sent to {}", request.service, self.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn request(phone: &str) -> QuoteRequest {
        QuoteRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: phone.to_string(),
            service: "Roofing".to_string(),
            message: "Please quote a full roof replacement.".to_string(),
        }
    }

    fn config() -> MailConfig {
        MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "site@example.com".to_string(),
            password: "secret".to_string(),
            to: "quotes@example.com".to_string(),
        }
    }

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_subject() {
        assert_eq!(request("").subject(), "New Quote Request — Roofing");
    }

    #[test]
    fn test_body_layout() {
        assert_eq!(
            request("555 123 4567").body(received_at()),
            "Time (UTC): 2026-10-14T09:30:00.000000Z\n\
             Name: Ada Lovelace\n\
             Email: ada@example.com\n\
             Phone: 555 123 4567\n\
             Service: Roofing\n\
             \n\
             Message:\n\
             Please quote a full roof replacement.\n"
        );
    }

    #[test]
    fn test_blank_phone_is_dashed() {
        assert!(request("").body(received_at()).contains("Phone: —\n"));
    }

    // the SMTP pool wants a runtime
    #[tokio::test]
    async fn test_compose_sets_reply_to() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let formatted = String::from_utf8(mailer.compose(&request(""), received_at()).unwrap().formatted()).unwrap();
        assert!(formatted.contains("Reply-To: ada@example.com"));
        assert!(formatted.contains("To: quotes@example.com"));
        assert!(formatted.contains("From: site@example.com"));
    }

    #[tokio::test]
    async fn test_compose_without_parsable_reply_to() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let mut odd = request("");
        odd.email = "not an address".to_string();
        let formatted = String::from_utf8(mailer.compose(&odd, received_at()).unwrap().formatted()).unwrap();
        assert!(!formatted.contains("Reply-To"));
    }

    #[tokio::test]
    async fn test_invalid_recipient() {
        let mut bad = config();
        bad.to = "nobody".to_string();
        assert!(matches!(SmtpMailer::new(&bad), Err(MailError::Address(_))));
    }
}
