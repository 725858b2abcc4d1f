use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use copier_types::errors::ValidationError;
use serde_json::json;
use thiserror::Error;

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::Validation(err) => {
                tracing::warn!(reason = %err, "Request rejected");
                (StatusCode::BAD_REQUEST, err.to_string(), "VALIDATION_ERROR")
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}
