//! Error types for the tokenwall middleware and extractors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use recipe_auth_core::AuthError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: &'static str,
}

/// Reasons the gate refuses a request.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No token was presented.
    #[error("token required")]
    TokenRequired,

    /// The token was presented but rejected.
    #[error(transparent)]
    Rejected(#[from] AuthError),
}

impl GateError {
    /// HTTP status for this rejection.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TokenRequired => StatusCode::UNAUTHORIZED,
            Self::Rejected(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Stable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenRequired => "TOKEN_REQUIRED",
            Self::Rejected(err) => err.error_code(),
        }
    }

    /// Client-facing message. Fixed per code so nothing from the
    /// verification internals reaches the caller.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self.code() {
            "TOKEN_REQUIRED" => "Authentication token required",
            "TOKEN_INVALID" => "Invalid token",
            "TOKEN_EXPIRED" => "Token has expired",
            "TOKEN_NOT_YET_VALID" => "Token is not yet valid",
            "TOKEN_WRONG_TYPE" => "Token type not accepted for this resource",
            "INVALID_INPUT" => "Invalid request",
            _ => "Internal error",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        if let Self::Rejected(err) = &self {
            if err.is_configuration() {
                tracing::error!(error = %err, "Token verification misconfigured");
            }
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}
