//! Error types for the Recipe.Report API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recipe_auth_core::AuthError;
use recipe_axum::{ErrorDetail, ErrorResponse, GateError};

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(err) => err.error_code(),
        }
    }

    fn is_internal(&self) -> bool {
        match self {
            Self::Auth(err) => err.is_configuration(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log internal errors
        if self.is_internal() {
            tracing::error!(error = %self, "Internal API error");
        }

        // Token failures share the gate's client-facing messages
        let message = match &self {
            Self::Auth(err) => GateError::Rejected(err.clone()).message(),
        };

        let body = ErrorResponse {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
