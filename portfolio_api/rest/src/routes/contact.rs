use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_validation::{contact_rules, FieldError};
use serde::Serialize;

use crate::models::{contact::ApiContactMessage, ApiEmailResult};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(
            "/api/contact",
            routing::get(probe).post(send_message),
        )
        .with_state(service)
}

#[derive(Serialize)]
struct ProbeResponse {
    message: &'static str,
}

async fn probe() -> Response {
    Json(ProbeResponse {
        message: "Contact API is working",
    })
    .into_response()
}

#[derive(Serialize)]
struct SendSuccessResponse {
    success: bool,
    message: &'static str,
    #[serde(rename = "emailResult")]
    email_result: ApiEmailResult,
}

#[derive(Serialize)]
struct SendFailureResponse {
    success: bool,
    message: &'static str,
    error: &'static str,
}

#[derive(Serialize)]
struct ValidationFailureResponse {
    success: bool,
    message: &'static str,
    errors: Vec<FieldError>,
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    payload: Result<Json<ApiContactMessage>, JsonRejection>,
) -> Response {
    // The payload is never trusted to have been validated client-side.
    let Ok(Json(payload)) = payload else {
        return validation_error("Invalid request body", Vec::new());
    };

    let report = payload.validate(contact_rules());
    if !report.is_valid() {
        return validation_error("Validation error", report.errors);
    }

    let message = match payload.try_into() {
        Ok(message) => message,
        Err(error) => return validation_error("Validation error", vec![error]),
    };

    match service.send_message(message).await {
        Ok(receipt) => Json(SendSuccessResponse {
            success: true,
            message: "Email sent successfully",
            email_result: receipt.into(),
        })
        .into_response(),
        Err(ContactSendMessageError::Send(err)) => {
            tracing::error!("Failed to send contact message: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendFailureResponse {
                    success: false,
                    message: "Failed to send email",
                    error: "Could not send message",
                }),
            )
                .into_response()
        }
    }
}

fn validation_error(message: &'static str, errors: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationFailureResponse {
            success: false,
            message,
            errors,
        }),
    )
        .into_response()
}
