use anyhow::Context;
use clap::Subcommand;
use portfolio_config::Config;
use portfolio_email_contracts::{ContentType, Email, EmailService};
use portfolio_models::email_address::EmailAddress;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddress },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddress) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email)?;

    let receipt = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await
        .context("Failed to send email")?;

    if receipt.simulated {
        println!("Delivery was simulated; configure an smtp transport to send real mail.");
    } else {
        println!(
            "Email sent. Message ID: {}",
            receipt.message_id.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
