use std::{sync::Arc, time::Duration};

use portfolio_core_health_contracts::{HealthFeatureService, HealthStatus};
use portfolio_email_contracts::EmailService;
use tokio::{sync::RwLock, time::Instant};
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Email> {
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug)]
struct State {
    started: Instant,
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    email: bool,
    checked_at: Instant,
}

impl<Email> HealthFeatureServiceImpl<Email> {
    pub fn new(email: Email, config: HealthFeatureConfig) -> Self {
        Self {
            email,
            config,
            state: Arc::new(State {
                started: Instant::now(),
                cache: RwLock::new(None),
            }),
        }
    }
}

impl<Email> HealthFeatureService for HealthFeatureServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = Instant::now();
        let uptime = now - self.state.started;

        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.checked_at + self.config.cache_ttl)
        {
            return HealthStatus {
                email: cached.email,
                uptime,
            };
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.checked_at + self.config.cache_ttl)
        {
            return HealthStatus {
                email: cached.email,
                uptime,
            };
        }

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        *cache_guard = Some(CachedStatus {
            email,
            checked_at: now,
        });

        HealthStatus { email, uptime }
    }
}
