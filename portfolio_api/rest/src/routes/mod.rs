use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err}");

    #[derive(Serialize)]
    struct InternalErrorResponse {
        success: bool,
        message: &'static str,
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalErrorResponse {
            success: false,
            message: "Internal server error",
        }),
    )
        .into_response()
}
