use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::settings::SmtpSettings;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: String,
    /// Display name shown next to the relay's own sender address.
    pub from_name: Option<String>,
    pub reply_to: String,
    pub subject: String,
    pub html_body: String,
}

impl OutgoingEmail {
    pub fn to_message(&self) -> Result<Message, MailError> {
        let from = Mailbox::new(self.from_name.clone(), self.from.parse()?);
        let reply_to = Mailbox::new(self.from_name.clone(), self.reply_to.parse()?);
        let to = Mailbox::new(None, self.to.parse()?);

        let message = Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(self.html_body.clone())?;
        Ok(message)
    }
}

/// The host mail transport. One call per accepted submission; retries are the
/// caller's decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        // 465 is implicit TLS, everything else upgrades with STARTTLS
        let builder = if settings.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };
        let mut builder = builder.port(settings.port);

        if let Some((username, password)) = &settings.credentials {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(SmtpMailer {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = email.to_message()?;
        let response = self.transport.send(message).await?;
        tracing::debug!("SMTP server answered with code {}", response.code());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "owner@jddpainting.com".to_string(),
            from: "website@jddpainting.com".to_string(),
            from_name: Some("Jane".to_string()),
            reply_to: "jane@x.com".to_string(),
            subject: "New Quote Request from JDD PAINTING Website - interior".to_string(),
            html_body: "<p>hello</p>".to_string(),
        }
    }

    #[test]
    fn message_carries_reply_to_and_html_content_type() {
        let formatted = String::from_utf8(email().to_message().unwrap().formatted()).unwrap();
        assert!(formatted.contains("Reply-To: Jane <jane@x.com>"));
        assert!(formatted.contains("From: Jane <website@jddpainting.com>"));
        assert!(formatted.contains("To: owner@jddpainting.com"));
        assert!(formatted.contains("Content-Type: text/html; charset=utf-8"));
    }

    #[test]
    fn bad_reply_to_is_an_address_error() {
        let mut email = email();
        email.reply_to = "nope".to_string();
        assert!(matches!(email.to_message(), Err(MailError::Address(_))));
    }
}
