//! HTTP error mapping

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use triage_core::ValidationErrors;

/// Error handling
#[derive(Debug)]
pub enum AppError {
    /// Field-level validation failure
    Validation(ValidationErrors),
    /// Body could not be read as JSON
    BadRequest(String),
    /// Unknown ticket or unmatched path
    NotFound(String),
    Internal(String),
}

impl From<triage_core::Error> for AppError {
    fn from(err: triage_core::Error) -> Self {
        match err {
            triage_core::Error::Validation(errors) => AppError::Validation(errors),
            triage_core::Error::NotFound(id) => {
                AppError::NotFound(format!("Ticket {} not found", id))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Path segments that do not parse (`/tickets/abc/`) match no ticket
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "invalid_request_error"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found"),
            AppError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "server_error")
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (
                triage_core::Error::validation("title", "This field is required."),
                StatusCode::BAD_REQUEST,
            ),
            (triage_core::Error::NotFound(7), StatusCode::NOT_FOUND),
            (
                triage_core::Error::store_unavailable("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
