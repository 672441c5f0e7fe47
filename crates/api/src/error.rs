//! API error responses.

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;
use tracing::error;

use caja_db::CashRegisterError;
use caja_shared::AppError;

/// Wrapper turning [`AppError`] into an HTTP response with an
/// `{"error", "message"}` body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CashRegisterError> for ApiError {
    fn from(err: CashRegisterError) -> Self {
        let app_err = match err {
            CashRegisterError::AlreadyOpen => {
                AppError::Conflict("a cash session is already open".to_string())
            }
            CashRegisterError::NoOpenSession => {
                AppError::NotFound("no open cash session".to_string())
            }
            CashRegisterError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app_err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal detail is logged, never surfaced to the client.
        let message = match &self.0 {
            AppError::Database(detail) | AppError::Internal(detail) => {
                error!(error = %detail, "Request failed");
                "An error occurred".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}
