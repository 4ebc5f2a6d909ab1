//! Configuration for the Recipe.Report API service.

use std::time::Duration;

use recipe_auth_core::{AuthConfig, CryptoConfig, SigningConfig};
use recipe_axum::DEFAULT_TOKEN_HEADER;

/// Minimum accepted length of `JWT_SECRET`
const MIN_SECRET_LEN: usize = 32;

/// API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Token core configuration
    pub auth: AuthConfig,

    /// Fallback header the tokenwall reads tokens from
    pub token_header: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        // Server port
        let http_port = var("HTTP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Symmetric cipher
        let crypto_key = var("CRYPTO_KEY").ok_or(ConfigError::Missing("CRYPTO_KEY"))?;
        let crypto_algorithm = var("CRYPTO_ALGORITHM").unwrap_or_else(|| "aes-256-cbc".to_string());
        let iv_length: usize = var("CRYPTO_IV_LENGTH")
            .unwrap_or_else(|| "16".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("CRYPTO_IV_LENGTH"))?;

        let crypto = CryptoConfig::from_key_material(&crypto_key, crypto_algorithm, iv_length)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?;

        // Signing secret (minimum 32 bytes)
        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be at least 32 characters",
            ));
        }

        let jwt_algorithm = var("JWT_ALGORITHM").unwrap_or_else(|| "HS512".to_string());

        // Token lifetimes (default 24 hours)
        let access_ttl_secs: u64 = var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL_SECS"))?;

        let activation_ttl_secs: u64 = var("ACTIVATION_TOKEN_TTL_SECS")
            .unwrap_or_else(|| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACTIVATION_TOKEN_TTL_SECS"))?;

        let signing = SigningConfig::new(jwt_secret)
            .with_algorithm_name(&jwt_algorithm)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_ttl(Duration::from_secs(access_ttl_secs))
            .with_activation_ttl(Duration::from_secs(activation_ttl_secs));

        let auth = AuthConfig::new(crypto, signing);
        auth.validate()
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?;

        let token_header = var("TOKEN_HEADER")
            .map(|h| h.trim().to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string());

        Ok(Self {
            http_port,
            auth,
            token_header,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
