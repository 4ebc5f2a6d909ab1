//! Router assembly

use axum::routing::get;
use axum::Router;
use recipe_axum::{TokenWallConfig, TokenWallLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the API router.
///
/// Routes that need an access token are grouped under the tokenwall.
pub fn router(state: AppState) -> Router {
    let wall = TokenWallLayer::with_config(
        state.issuer.clone(),
        TokenWallConfig::new().token_header(state.config.token_header.clone()),
    );

    let protected = Router::new()
        .route("/api/v1/users/me", get(handlers::me))
        .route_layer(wall);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/users/activate/:token", get(handlers::activate))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
