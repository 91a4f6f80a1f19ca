use std::sync::Arc;

use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_email_contracts::{ContentType, DeliveryReceipt, Email, EmailService};
use portfolio_models::{contact::ContactMessage, email_address::EmailAddress};

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Email> {
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub recipient: Arc<EmailAddress>,
}

impl<Email> ContactFeatureServiceImpl<Email> {
    pub fn new(email: Email, config: ContactFeatureConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactFeatureService for ContactFeatureServiceImpl<EmailS>
where
    EmailS: EmailService,
{
    async fn send_message(
        &self,
        message: ContactMessage,
    ) -> Result<DeliveryReceipt, ContactSendMessageError> {
        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("Portfolio Contact: {}", *message.subject),
            body: render_body(&message),
            content_type: ContentType::Html,
            reply_to: Some(message.author.email),
        };

        self.email
            .send(email)
            .await
            .map_err(ContactSendMessageError::Send)
    }
}

fn render_body(message: &ContactMessage) -> String {
    format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Subject:</strong> {subject}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{content}</p>\n\
         <hr>\n\
         <p><small>Sent from portfolio contact form</small></p>",
        name = escape_html(&message.author.name),
        email = escape_html(message.author.email.as_str()),
        subject = escape_html(&message.subject),
        content = escape_html(&message.content),
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use portfolio_email_contracts::MockEmailService;
    use portfolio_models::contact::ContactMessageAuthor;
    use portfolio_utils::assert_matches;

    use super::*;

    fn config() -> ContactFeatureConfig {
        ContactFeatureConfig {
            recipient: Arc::new("contact@example.com".parse().unwrap()),
        }
    }

    fn message() -> ContactMessage {
        ContactMessage {
            author: ContactMessageAuthor {
                name: "Jane Doe".try_into().unwrap(),
                email: "jane@example.com".parse().unwrap(),
            },
            subject: "Project inquiry".try_into().unwrap(),
            content: "I would like to discuss a project with you.".try_into().unwrap(),
        }
    }

    fn expected_email(config: &ContactFeatureConfig) -> Email {
        Email {
            recipient: (*config.recipient).clone(),
            subject: "Portfolio Contact: Project inquiry".into(),
            body: "<h2>New Contact Form Submission</h2>\n\
                   <p><strong>Name:</strong> Jane Doe</p>\n\
                   <p><strong>Email:</strong> jane@example.com</p>\n\
                   <p><strong>Subject:</strong> Project inquiry</p>\n\
                   <p><strong>Message:</strong></p>\n\
                   <p>I would like to discuss a project with you.</p>\n\
                   <hr>\n\
                   <p><small>Sent from portfolio contact form</small></p>"
                .into(),
            content_type: ContentType::Html,
            reply_to: Some("jane@example.com".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let config = config();
        let receipt = DeliveryReceipt {
            message_id: Some("<42@example.com>".into()),
            simulated: false,
        };

        let email = MockEmailService::new().with_send(expected_email(&config), receipt.clone());

        let sut = ContactFeatureServiceImpl::new(email, config);

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_eq!(result.unwrap(), receipt);
    }

    #[tokio::test]
    async fn simulated_receipt_is_passed_through() {
        // Arrange
        let config = config();
        let receipt = DeliveryReceipt {
            message_id: None,
            simulated: true,
        };

        let email = MockEmailService::new().with_send(expected_email(&config), receipt.clone());

        let sut = ContactFeatureServiceImpl::new(email, config);

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_eq!(result.unwrap(), receipt);
    }

    #[tokio::test]
    async fn error() {
        // Arrange
        let config = config();
        let email =
            MockEmailService::new().with_send_error(expected_email(&config), "connection reset");

        let sut = ContactFeatureServiceImpl::new(email, config);

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send(_)));
    }

    #[test]
    fn html_is_escaped() {
        let body = render_body(&ContactMessage {
            author: ContactMessageAuthor {
                name: "Jane Doe".try_into().unwrap(),
                email: "jane@example.com".parse().unwrap(),
            },
            subject: "Quotes \"and\" brackets".try_into().unwrap(),
            content: "<script>alert(1)</script> & more".try_into().unwrap(),
        });

        assert!(body.contains("Quotes &quot;and&quot; brackets"));
        assert!(body.contains("<p>&lt;script&gt;alert(1)&lt;/script&gt; &amp; more</p>"));
    }
}
