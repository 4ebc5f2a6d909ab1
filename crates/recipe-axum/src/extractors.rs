//! Axum extractors for the authenticated principal.
//!
//! These read what [`crate::TokenWallLayer`] attached to the request.
//!
//! # Usage
//!
//! ```ignore
//! use recipe_axum::{MaybeAuth, RequireAuth};
//!
//! async fn protected(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.subject_id)
//! }
//!
//! async fn maybe(auth: MaybeAuth) -> String {
//!     match auth.0 {
//!         Some(principal) => format!("Hello, {}!", principal.subject_id),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::AuthenticatedPrincipal;
use crate::error::GateError;

/// Extractor that requires an authenticated principal.
///
/// Returns 401 `TOKEN_REQUIRED` when the route is not behind the tokenwall.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedPrincipal);

impl Deref for RequireAuth {
    type Target = AuthenticatedPrincipal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(Self)
            .ok_or(GateError::TokenRequired)
    }
}

/// Extractor for an optional principal.
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<AuthenticatedPrincipal>);

impl Deref for MaybeAuth {
    type Target = Option<AuthenticatedPrincipal>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts.extensions.get::<AuthenticatedPrincipal>().cloned(),
        ))
    }
}
