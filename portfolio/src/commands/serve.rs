use std::sync::Arc;

use portfolio_config::Config;
use portfolio_core_contact_impl::{ContactFeatureConfig, ContactFeatureServiceImpl};
use portfolio_core_health_impl::{HealthFeatureConfig, HealthFeatureServiceImpl};
use portfolio_email_contracts::EmailService;
use tracing::info;

use crate::{email, environment::RestServer};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Setting up mail delivery");
    let email = email::connect(&config.email)?;
    email.ping().await?;

    let contact = ContactFeatureServiceImpl::new(
        email.clone(),
        ContactFeatureConfig {
            recipient: Arc::new(config.contact.email.clone()),
        },
    );
    let health = HealthFeatureServiceImpl::new(
        email,
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    let server = RestServer::new(health, contact);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
