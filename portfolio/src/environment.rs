//! Concrete service types wired together by the commands.

use portfolio_core_contact_impl::ContactFeatureServiceImpl;
use portfolio_core_health_impl::HealthFeatureServiceImpl;

// Email
pub type Email = portfolio_email_impl::EmailServiceImpl;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Email>;
pub type HealthFeature = HealthFeatureServiceImpl<Email>;

// API
pub type RestServer = portfolio_api_rest::RestServer<HealthFeature, ContactFeature>;
