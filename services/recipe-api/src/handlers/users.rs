//! User token handlers (activation exchange, me)

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use recipe_auth_core::TokenType;
use recipe_axum::RequireAuth;
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub subject_id: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/users/activate/:token
///
/// Exchange an activation token for an access token bound to the same subject
pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<TokenResponse>> {
    let claims = state.issuer.decode_as(&token, TokenType::Activation)?;
    let token = state.issuer.issue_access(&claims.sub)?;

    tracing::info!(jti = %claims.jti, "Activation token exchanged");

    Ok(Json(TokenResponse { token }))
}

/// GET /api/v1/users/me
///
/// Describe the principal the tokenwall resolved for this request
pub async fn me(auth: RequireAuth) -> Json<MeResponse> {
    let principal = auth.0;
    Json(MeResponse {
        subject_id: principal.subject_id,
        token_id: principal.token_id,
        expires_at: principal.expires_at,
    })
}
