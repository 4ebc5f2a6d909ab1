//! Tower middleware layer guarding protected routes.
//!
//! The [`TokenWallLayer`] requires a valid token of the configured type
//! (ACCESS by default) on every request it wraps. On success the resolved
//! [`AuthenticatedPrincipal`] is inserted into request extensions; otherwise
//! the request is answered with a [`GateError`] and never reaches the inner
//! service.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use pin_project_lite::pin_project;
use recipe_auth_core::{AuthError, TokenIssuer, TokenType};
use tower::{Layer, Service};

use crate::context::AuthenticatedPrincipal;
use crate::error::GateError;

/// Default raw header carrying a token when no bearer token is sent.
pub const DEFAULT_TOKEN_HEADER: &str = "x-access-token";

/// Configuration for the tokenwall layer.
#[derive(Debug, Clone)]
pub struct TokenWallConfig {
    /// Header read when `Authorization: Bearer` is absent.
    pub token_header: String,
    /// Token type the guarded routes accept.
    pub required_type: TokenType,
}

impl Default for TokenWallConfig {
    fn default() -> Self {
        Self {
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            required_type: TokenType::Access,
        }
    }
}

impl TokenWallConfig {
    /// Create a new config builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback token header name.
    #[must_use]
    pub fn token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }

    /// Set the token type guarded routes accept.
    #[must_use]
    pub fn required_type(mut self, token_type: TokenType) -> Self {
        self.required_type = token_type;
        self
    }
}

/// Tower layer that puts routes behind the tokenwall.
#[derive(Clone)]
pub struct TokenWallLayer {
    issuer: Arc<TokenIssuer>,
    config: TokenWallConfig,
}

impl TokenWallLayer {
    /// Create a new layer accepting ACCESS tokens.
    #[must_use]
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self {
            issuer,
            config: TokenWallConfig::default(),
        }
    }

    /// Create a new layer with custom configuration.
    #[must_use]
    pub fn with_config(issuer: Arc<TokenIssuer>, config: TokenWallConfig) -> Self {
        Self { issuer, config }
    }
}

impl<S> Layer<S> for TokenWallLayer {
    type Service = TokenWallService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TokenWallService {
            inner,
            issuer: Arc::clone(&self.issuer),
            config: self.config.clone(),
        }
    }
}

/// The tokenwall service.
#[derive(Clone)]
pub struct TokenWallService<S> {
    inner: S,
    issuer: Arc<TokenIssuer>,
    config: TokenWallConfig,
}

impl<S> TokenWallService<S> {
    /// Resolve the request's principal or the reason to reject it.
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedPrincipal, GateError> {
        let token = extract_token(headers, &self.config.token_header)?;

        let claims = self.issuer.decode(&token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            GateError::from(e)
        })?;

        claims.require_type(self.config.required_type).map_err(|e| {
            tracing::debug!(jti = %claims.jti, error = %e, "Token rejected");
            GateError::from(e)
        })?;

        tracing::debug!(jti = %claims.jti, "Token accepted");
        Ok(AuthenticatedPrincipal::from(claims))
    }
}

/// Pull the token from `Authorization: Bearer` or the fallback header.
fn extract_token(headers: &HeaderMap, fallback_header: &str) -> Result<String, GateError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| GateError::from(AuthError::InvalidToken))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return non_empty(token);
        }
    }

    if let Some(value) = headers.get(fallback_header) {
        let token = value
            .to_str()
            .map_err(|_| GateError::from(AuthError::InvalidToken))?;
        return non_empty(token);
    }

    Err(GateError::TokenRequired)
}

fn non_empty(token: &str) -> Result<String, GateError> {
    let token = token.trim();
    if token.is_empty() {
        Err(GateError::TokenRequired)
    } else {
        Ok(token.to_string())
    }
}

impl<S, B> Service<Request<B>> for TokenWallService<S>
where
    S: Service<Request<B>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = TokenWallFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        match self.authenticate(req.headers()) {
            Ok(principal) => {
                req.extensions_mut().insert(principal);
                TokenWallFuture::Calling {
                    future: self.inner.call(req),
                }
            }
            Err(err) => TokenWallFuture::Rejected {
                response: Some(err.into_response()),
            },
        }
    }
}

// Future for the tokenwall service
pin_project! {
    #[project = TokenWallFutureProj]
    pub enum TokenWallFuture<F> {
        Calling {
            #[pin]
            future: F,
        },
        Rejected {
            response: Option<Response>,
        },
    }
}

impl<F, E> Future for TokenWallFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            TokenWallFutureProj::Calling { future } => future.poll(cx),
            TokenWallFutureProj::Rejected { response } => Poll::Ready(Ok(response
                .take()
                .expect("TokenWallFuture polled after completion"))),
        }
    }
}
