use std::fmt;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message,
    SmtpTransport,
    Transport
};

use crate::{
    config::EmailCredentials,
    error::DeliveryError,
    format::Formatter,
    model::PaperRecord
};

pub const SMTP_HOST: &str = "smtp.gmail.com";
pub const SMTP_PORT: u16 = 587;

/// Delivers one digest per call. Failures come back as values, never panics.
pub trait Mailer {
    fn send(&self, credentials: &EmailCredentials, papers: &[PaperRecord]) -> Result<(), DeliveryError>;
}

pub fn build_message(credentials: &EmailCredentials, papers: &[PaperRecord]) -> Result<Message, DeliveryError> {
    let from: Mailbox = credentials.sender_address.parse()?;
    let to: Mailbox = credentials.recipient_address.parse()?;
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(Formatter::digest_subject(papers.len()))
        .header(ContentType::TEXT_PLAIN)
        .body(Formatter::digest_body(papers))?;
    Ok(message)
}

// Sends over an already configured lettre transport.
pub struct TransportMailer<T> {
    transport: T
}

impl<T> TransportMailer<T> {
    pub fn new(transport: T) -> Self {
        TransportMailer {
            transport
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T> Mailer for TransportMailer<T>
where
    T: Transport,
    T::Error: fmt::Display,
{
    fn send(&self, credentials: &EmailCredentials, papers: &[PaperRecord]) -> Result<(), DeliveryError> {
        let message = build_message(credentials, papers)?;
        self.transport
            .send(&message)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// STARTTLS relay authenticated as the sender. Opens a fresh session for every send.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16) -> Self {
        SmtpMailer {
            host: host.to_string(),
            port
        }
    }

    fn transport(&self, credentials: &EmailCredentials) -> Result<SmtpTransport, DeliveryError> {
        let transport = SmtpTransport::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.sender_address.clone(),
                credentials.sender_secret.clone()
            ))
            .build();
        Ok(transport)
    }
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new(SMTP_HOST, SMTP_PORT)
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, credentials: &EmailCredentials, papers: &[PaperRecord]) -> Result<(), DeliveryError> {
        let message = build_message(credentials, papers)?;
        self.transport(credentials)?.send(&message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lettre::transport::stub::StubTransport;

    use super::*;

    fn credentials() -> EmailCredentials {
        EmailCredentials::new("sender@example.com", "app-password", "reader@example.com")
    }

    fn papers() -> Vec<PaperRecord> {
        vec![PaperRecord {
            title: "Paper".to_string(),
            summary: "Short abstract.".to_string(),
            link: "http://arxiv.org/abs/2501.00001v1".to_string(),
            authors: "A. Author".to_string(),
            category: "hep-ex".to_string()
        }]
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(&credentials(), &papers()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: arXiv Paper Notification - 1 New Papers"), "{}", raw);
        assert!(raw.contains("Content-Type: text/plain"), "{}", raw);
        let envelope = message.envelope();
        assert_eq!(envelope.from().unwrap().to_string(), "sender@example.com");
        assert_eq!(envelope.to()[0].to_string(), "reader@example.com");
    }

    #[test]
    fn test_bad_address() {
        let creds = EmailCredentials::new("not an address", "x", "reader@example.com");
        let err = build_message(&creds, &papers()).unwrap_err();
        assert!(matches!(err, DeliveryError::Address(_)), "got {:?}", err);
    }

    #[test]
    fn test_send_through_transport() {
        let mailer = TransportMailer::new(StubTransport::new_ok());
        mailer.send(&credentials(), &papers()).unwrap();
        let sent = mailer.transport().messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.to()[0].to_string(), "reader@example.com");
    }

    #[test]
    fn test_transport_failure_is_returned() {
        let mailer = TransportMailer::new(StubTransport::new_error());
        let err = mailer.send(&credentials(), &papers()).unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)), "got {:?}", err);
    }

    #[test]
    fn test_default_relay() {
        let mailer = SmtpMailer::default();
        assert_eq!(mailer.host, SMTP_HOST);
        assert_eq!(mailer.port, SMTP_PORT);
    }
}
