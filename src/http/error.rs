//! Error responses for the REST API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::AppError;

/// HTTP status for each error kind.
#[must_use]
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::InvalidOperation { .. }
        | AppError::MalformedImport { .. }
        | AppError::UnknownStrategy { .. }
        | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::StorageIo { .. }
        | AppError::JsonParse { .. }
        | AppError::Config { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if self.is_client_error() {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        } else {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
