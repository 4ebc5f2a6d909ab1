//! Auth errors

use thiserror::Error;

use crate::token::TokenType;

/// Errors raised while issuing, verifying or decrypting tokens.
///
/// Display strings are safe to log but are never forwarded to a client
/// verbatim; use [`AuthError::error_code`] for that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A required secret, algorithm or length is missing or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller passed an empty subject, the `None` token type or an empty token
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Signature mismatch, malformed structure or wrong algorithm
    #[error("invalid token")]
    InvalidToken,

    /// `now >= exp`
    #[error("token expired")]
    TokenExpired,

    /// `now < nbf`
    #[error("token not yet valid")]
    TokenNotYetValid,

    /// Token verified but carries a type the caller does not accept
    #[error("wrong token type: expected {expected}, got {actual}")]
    WrongTokenType {
        expected: TokenType,
        actual: TokenType,
    },

    /// Encrypted payload could not be decrypted or decoded
    #[error("decryption failed")]
    Decryption,
}

impl AuthError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken
            | Self::TokenExpired
            | Self::TokenNotYetValid
            | Self::Decryption => 401,
            Self::WrongTokenType { .. } => 403,
            Self::InvalidInput(_) => 400,
            Self::Configuration(_) => 500,
        }
    }

    /// Get error code for API responses
    ///
    /// Decryption failures share `TOKEN_INVALID` so a caller cannot tell
    /// which layer rejected the token.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken | Self::Decryption => "TOKEN_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            Self::WrongTokenType { .. } => "TOKEN_WRONG_TYPE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the error points at a deployment defect rather than the caller
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
