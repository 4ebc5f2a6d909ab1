//! Recipe.Report Axum Integration
//!
//! The tokenwall: Axum middleware and extractors that gate routes on a valid
//! ACCESS token issued by `recipe-auth-core`.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use recipe_axum::{RequireAuth, TokenWallLayer};
//! use axum::{Router, routing::get};
//!
//! async fn protected_handler(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.subject_id)
//! }
//!
//! let app = Router::new()
//!     .route("/api/v1/users/me", get(protected_handler))
//!     .route_layer(TokenWallLayer::new(Arc::new(issuer)));
//! ```
//!
//! # Rejections
//!
//! Requests without a usable token never reach the handler. They are
//! answered with `{ "error": { "code", "message" } }`, where `code` is one of
//! `TOKEN_REQUIRED`, `TOKEN_INVALID`, `TOKEN_EXPIRED`, `TOKEN_NOT_YET_VALID`
//! or `TOKEN_WRONG_TYPE`.

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

// Re-export primary types
pub use context::AuthenticatedPrincipal;
pub use error::{ErrorDetail, ErrorResponse, GateError};
pub use extractors::{MaybeAuth, RequireAuth};
pub use layer::{TokenWallConfig, TokenWallFuture, TokenWallLayer, TokenWallService, DEFAULT_TOKEN_HEADER};
