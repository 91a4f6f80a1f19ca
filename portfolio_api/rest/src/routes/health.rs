use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use chrono::Utc;
use portfolio_core_health_contracts::{HealthFeatureService, HealthStatus};
use portfolio_utils::portfolio_version;
use serde::Serialize;

pub fn router(service: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/health", routing::get(health))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
    version: &'static str,
    email: bool,
}

async fn health(service: State<Arc<impl HealthFeatureService>>) -> Response {
    let HealthStatus { email, uptime } = service.get_status().await;

    let response = HealthResponse {
        status: if email { "healthy" } else { "degraded" },
        timestamp: Utc::now().to_rfc3339(),
        uptime: uptime.as_secs(),
        version: portfolio_version(),
        email,
    };

    Json(response).into_response()
}
