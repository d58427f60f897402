// # Mail Notifier
//
// Sends the summary of a pass as a plain-text mail through the SMTP server on
// localhost (port 25, no TLS), the way a local MTA expects to be used.

use async_trait::async_trait;
use cfddns_core::traits::Notifier;
use cfddns_core::{Error, NotificationConfig, Result};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Notifier delivering pass summaries by mail
pub struct MailNotifier {
    from: Mailbox,
    to: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl MailNotifier {
    /// Create a notifier relaying through localhost:25
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either address does not parse.
    pub fn new(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: parse_mailbox("from", from)?,
            to: parse_mailbox("to", to)?,
            mailer: AsyncSmtpTransport::<Tokio1Executor>::unencrypted_localhost(),
        })
    }

    /// Create a notifier relaying through `host:port` without TLS
    pub fn with_relay(from: &str, to: &str, host: &str, port: u16) -> Result<Self> {
        Ok(Self {
            from: parse_mailbox("from", from)?,
            to: parse_mailbox("to", to)?,
            mailer: AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .build(),
        })
    }

    /// Create a notifier from the `notification` configuration section
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        Self::new(&config.from, &config.to)
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| Error::notification(format!("Failed to build message: {}", e)))
    }
}

fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| Error::config(format!("notification.{} '{}' is invalid: {}", field, address, e)))
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        let message = self.build_message(subject, body)?;

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| Error::notification(format!("Failed to send email: {}", e)))?;

        tracing::info!(
            "Notification sent to {}: {}",
            self.to,
            response.message().collect::<Vec<&str>>().join(" ")
        );
        Ok(())
    }
}
