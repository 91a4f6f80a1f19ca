use std::future::Future;

use portfolio_email_contracts::DeliveryReceipt;
use portfolio_models::contact::ContactMessage;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Relays the contact message to the configured recipient. Exactly one
    /// delivery attempt is made per call; failures are reported, not retried.
    fn send_message(
        &self,
        message: ContactMessage,
    ) -> impl Future<Output = Result<DeliveryReceipt, ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Failed to send message.")]
    Send(#[source] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(mut self, message: ContactMessage, receipt: DeliveryReceipt) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| Box::pin(std::future::ready(Ok(receipt))));
        self
    }

    pub fn with_send_message_error(mut self, message: ContactMessage) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| {
                Box::pin(std::future::ready(Err(ContactSendMessageError::Send(
                    anyhow::anyhow!("Failed to send message."),
                ))))
            });
        self
    }
}
