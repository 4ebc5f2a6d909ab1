//! Configuration types for token issuance and claim encryption
//!
//! Values are constructed once at startup and handed to [`crate::Cipher`] and
//! [`crate::TokenIssuer`]. Nothing in this crate reads the environment.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::Algorithm;

use crate::cipher::{parse_key_material, CipherAlgorithm};
use crate::AuthError;

/// Default lifetime for tokens of either type
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Symmetric cipher configuration.
///
/// An empty key, an empty algorithm or a zero IV length counts as "not
/// defined"; every cipher operation re-checks this and fails instead of
/// skipping encryption.
#[derive(Clone, Default)]
pub struct CryptoConfig {
    /// Raw key bytes, length must match the algorithm's key size
    pub key: Vec<u8>,
    /// Algorithm identifier, e.g. `aes-256-cbc`
    pub algorithm: String,
    /// IV length in bytes
    pub iv_length: usize,
}

impl CryptoConfig {
    /// Create a new crypto config
    pub fn new(key: impl Into<Vec<u8>>, algorithm: impl Into<String>, iv_length: usize) -> Self {
        Self {
            key: key.into(),
            algorithm: algorithm.into(),
            iv_length,
        }
    }

    /// Build a config from textual key material (hex, base64 or raw bytes).
    ///
    /// The algorithm is resolved first so the key can be decoded to the
    /// exact size the cipher expects.
    pub fn from_key_material(
        key: &str,
        algorithm: impl Into<String>,
        iv_length: usize,
    ) -> Result<Self, AuthError> {
        let algorithm = algorithm.into();
        let resolved: CipherAlgorithm = algorithm.parse()?;
        let key = parse_key_material(key, resolved.key_len()).ok_or_else(|| {
            AuthError::config(format!(
                "key must be {} bytes (raw, hex or base64) for {}",
                resolved.key_len(),
                resolved
            ))
        })?;
        Ok(Self::new(key, algorithm, iv_length))
    }

    /// Check that every value is present and consistent.
    pub fn validate(&self) -> Result<CipherAlgorithm, AuthError> {
        if self.key.is_empty() {
            return Err(AuthError::config("key not defined"));
        }
        if self.iv_length == 0 {
            return Err(AuthError::config("iv length not defined"));
        }
        if self.algorithm.trim().is_empty() {
            return Err(AuthError::config("algorithm not defined"));
        }

        let algorithm: CipherAlgorithm = self.algorithm.parse()?;
        if self.key.len() != algorithm.key_len() {
            return Err(AuthError::config(format!(
                "key length {} does not match {} (expected {})",
                self.key.len(),
                algorithm,
                algorithm.key_len()
            )));
        }
        if self.iv_length != algorithm.iv_len() {
            return Err(AuthError::config(format!(
                "iv length {} does not match {} (expected {})",
                self.iv_length,
                algorithm,
                algorithm.iv_len()
            )));
        }
        Ok(algorithm)
    }
}

impl std::fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("key_length", &self.key.len())
            .field("algorithm", &self.algorithm)
            .field("iv_length", &self.iv_length)
            .finish()
    }
}

/// JWT signing configuration
#[derive(Clone)]
pub struct SigningConfig {
    /// HMAC secret, kept separate from the symmetric key
    pub secret: Vec<u8>,
    /// Signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Default lifetime of access tokens
    pub access_ttl: Duration,
    /// Default lifetime of activation tokens
    pub activation_ttl: Duration,
}

impl SigningConfig {
    /// Create a signing config using HS512 and 24 hour lifetimes
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS512,
            access_ttl: DEFAULT_TOKEN_TTL,
            activation_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Set the signing algorithm by name (`HS256`, `HS384` or `HS512`)
    pub fn with_algorithm_name(mut self, name: &str) -> Result<Self, AuthError> {
        let algorithm: Algorithm = name
            .trim()
            .to_ascii_uppercase()
            .parse()
            .map_err(|_| AuthError::config(format!("unknown signing algorithm: {name}")))?;
        self.algorithm = algorithm;
        self.validate_algorithm()?;
        Ok(self)
    }

    /// Set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set activation token lifetime
    pub fn with_activation_ttl(mut self, ttl: Duration) -> Self {
        self.activation_ttl = ttl;
        self
    }

    /// Check that a secret is present, the algorithm is symmetric and both
    /// lifetimes yield a representable expiry
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::config("signing secret not defined"));
        }
        self.validate_algorithm()?;
        validate_ttl("access", self.access_ttl)?;
        validate_ttl("activation", self.activation_ttl)
    }

    fn validate_algorithm(&self) -> Result<(), AuthError> {
        match self.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(()),
            other => Err(AuthError::config(format!(
                "signing algorithm {other:?} is not an HMAC algorithm"
            ))),
        }
    }
}

fn validate_ttl(kind: &str, ttl: Duration) -> Result<(), AuthError> {
    if ttl.is_zero() {
        return Err(AuthError::config(format!("{kind} token lifetime is zero")));
    }
    ChronoDuration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .map(|_| ())
        .ok_or_else(|| AuthError::config(format!("{kind} token lifetime out of range")))
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("secret_length", &self.secret.len())
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("activation_ttl", &self.activation_ttl)
            .finish()
    }
}

/// Everything the token core needs
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub crypto: CryptoConfig,
    pub signing: SigningConfig,
}

impl AuthConfig {
    /// Create a new auth config
    pub fn new(crypto: CryptoConfig, signing: SigningConfig) -> Self {
        Self { crypto, signing }
    }

    /// Validate both halves; call at startup to fail before serving traffic
    pub fn validate(&self) -> Result<(), AuthError> {
        self.crypto.validate()?;
        self.signing.validate()
    }
}
