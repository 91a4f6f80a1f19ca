use anyhow::Context;
use portfolio_config::EmailConfig;
use portfolio_email_impl::EmailServiceImpl;
use tracing::info;

/// Selects the mail delivery strategy based on the presence of SMTP
/// credentials in the configuration.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    match &config.smtp {
        Some(smtp) => EmailServiceImpl::smtp(
            &smtp.host,
            smtp.port,
            smtp.user.clone(),
            smtp.password.clone(),
            config.from.clone(),
        )
        .context("Failed to set up the SMTP transport"),
        None => {
            info!("SMTP transport not configured, falling back to simulated delivery");
            Ok(EmailServiceImpl::simulated(config.simulated_delay.into()))
        }
    }
}
