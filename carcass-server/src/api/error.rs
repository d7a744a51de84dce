//! API error responses
//!
//! Every failure is returned as `{"error": "<message>"}` with the status
//! code the viewer keys its NotFound / DataUnavailable handling on.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Carcass not found: {0}")]
    CarcassNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error checking images: {0}")]
    ImageCheck(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::CarcassNotFound(_) => (StatusCode::NOT_FOUND, "Carcass not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            ApiError::ImageCheck(msg) => {
                error!("Error checking images: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error checking images".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
