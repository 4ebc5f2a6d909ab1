//! Request context attached by the tokenwall.
//!
//! The [`AuthenticatedPrincipal`] lives in request extensions for the
//! duration of a single request.

use chrono::{DateTime, Utc};

use recipe_auth_core::TokenClaims;

/// The bearer a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    /// Subject the token was issued to.
    pub subject_id: String,
    /// Unique id of the presented token, for log correlation.
    pub token_id: String,
    /// When the presented token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedPrincipal {
    /// Create a principal for a subject.
    #[must_use]
    pub fn new(
        subject_id: impl Into<String>,
        token_id: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            token_id: token_id.into(),
            expires_at,
        }
    }
}

impl From<TokenClaims> for AuthenticatedPrincipal {
    fn from(claims: TokenClaims) -> Self {
        let expires_at = claims.expires_at();
        Self {
            subject_id: claims.sub,
            token_id: claims.jti,
            expires_at,
        }
    }
}
