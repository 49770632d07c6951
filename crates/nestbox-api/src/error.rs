//! HTTP error mapping for the core error taxonomy.
//!
//! Every failure leaves the API as a structured envelope:
//! `{"error": {"code": <SCREAMING_SNAKE>, "message": <text>}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nestbox_core::CoreError;
use serde::Serialize;

/// API-level error wrapping the core taxonomy.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

/// Error response envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Error code and human-readable message.
#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            CoreError::WebhookNotFound(_) => (StatusCode::NOT_FOUND, "WEBHOOK_NOT_FOUND"),
            CoreError::InvalidKey(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            CoreError::Deserialization(err) => {
                tracing::error!(error = %err, "stored item failed to deserialize");
                (StatusCode::INTERNAL_SERVER_ERROR, "DESERIALIZATION_ERROR")
            },
            CoreError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            },
        };

        let body = ErrorBody { error: ErrorDetail { code, message: self.0.to_string() } };
        (status, Json(body)).into_response()
    }
}
