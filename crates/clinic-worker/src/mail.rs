//! Outgoing email seam.

use async_trait::async_trait;
use tracing::info;

use clinic_core::error::AppError;

/// One email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Anything that can send an email.
#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug + 'static {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError>;
}

/// Transport that writes the mail to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            body_len = mail.body.len(),
            "Email delivered to log transport"
        );
        Ok(())
    }
}
