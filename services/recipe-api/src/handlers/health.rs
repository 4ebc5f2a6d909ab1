//! Health check handler

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> &'static str {
    "OK"
}
