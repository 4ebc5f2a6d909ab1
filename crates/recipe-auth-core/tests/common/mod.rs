//! Common test utilities for recipe-auth-core integration tests

use recipe_auth_core::{AuthConfig, Cipher, CryptoConfig, SigningConfig, TokenIssuer};

/// Signing secret used across integration tests
pub const TEST_SIGNING_SECRET: &str = "integration-test-signing-secret-0123456789";

/// 32 byte AES-256 key
pub const TEST_CRYPTO_KEY: [u8; 32] = [0x5a; 32];

pub fn crypto_config() -> CryptoConfig {
    CryptoConfig::new(TEST_CRYPTO_KEY.to_vec(), "aes-256-cbc", 16)
}

#[allow(dead_code)]
pub fn signing_config() -> SigningConfig {
    SigningConfig::new(TEST_SIGNING_SECRET)
}

#[allow(dead_code)]
pub fn auth_config() -> AuthConfig {
    AuthConfig::new(crypto_config(), signing_config())
}

#[allow(dead_code)]
pub fn test_cipher() -> Cipher {
    Cipher::new(crypto_config())
}

#[allow(dead_code)]
pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(auth_config())
}
