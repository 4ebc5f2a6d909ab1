//! Application state

use std::sync::Arc;

use recipe_auth_core::TokenIssuer;

use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Token issuer for activation exchange and the tokenwall
    pub issuer: Arc<TokenIssuer>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        let issuer = TokenIssuer::new(config.auth.clone());
        Self {
            issuer: Arc::new(issuer),
            config: Arc::new(config),
        }
    }
}
