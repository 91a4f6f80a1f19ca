use std::time::Duration;

use anyhow::{anyhow, bail};
use lettre::{
    message::{header, Mailbox, MessageBuilder},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{ContentType, DeliveryReceipt, Email, EmailService};
use portfolio_models::email_address::EmailAddress;
use portfolio_utils::Apply;
use tracing::debug;
use uuid::Uuid;

/// Mail delivery strategy, selected once at startup: a real SMTP transport
/// when credentials are configured, otherwise a simulated transport that
/// accepts every message without sending anything.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl {
    Smtp(SmtpEmailService),
    Simulated(SimulatedEmailService),
}

impl EmailServiceImpl {
    pub fn smtp(
        host: &str,
        port: u16,
        user: String,
        password: String,
        from: EmailAddress,
    ) -> anyhow::Result<Self> {
        SmtpEmailService::new(host, port, user, password, from).map(Self::Smtp)
    }

    pub fn simulated(delay: Duration) -> Self {
        Self::Simulated(SimulatedEmailService { delay })
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<DeliveryReceipt> {
        match self {
            Self::Smtp(service) => service.send(email).await,
            Self::Simulated(service) => service.send(email).await,
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Smtp(service) => service.ping().await,
            Self::Simulated(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    pub fn new(
        host: &str,
        port: u16,
        user: String,
        password: String,
        from: EmailAddress,
    ) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(user, password))
            .build();

        Ok(Self { from, transport })
    }

    async fn send(&self, email: Email) -> anyhow::Result<DeliveryReceipt> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.from.domain());

        let message: Message = Message::builder()
            .from(Mailbox::new(None, self.from.0.clone()))
            .to(Mailbox::new(None, email.recipient.0))
            .apply_map(
                email.reply_to.map(|reply_to| Mailbox::new(None, reply_to.0)),
                MessageBuilder::reply_to,
            )
            .message_id(Some(message_id.clone()))
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)?;

        let response = self.transport.send(message).await?;
        if !response.is_positive() {
            bail!("SMTP server rejected the message: {}", response.code());
        }

        Ok(DeliveryReceipt {
            message_id: Some(message_id),
            simulated: false,
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

/// Development fallback used when no SMTP credentials are configured. Waits
/// for the configured artificial delay, then reports a successful delivery
/// marked as simulated.
#[derive(Debug, Clone)]
pub struct SimulatedEmailService {
    delay: Duration,
}

impl SimulatedEmailService {
    async fn send(&self, email: Email) -> anyhow::Result<DeliveryReceipt> {
        debug!(recipient = %email.recipient, subject = %email.subject, "simulating email delivery");
        tokio::time::sleep(self.delay).await;
        Ok(DeliveryReceipt {
            message_id: None,
            simulated: true,
        })
    }
}
