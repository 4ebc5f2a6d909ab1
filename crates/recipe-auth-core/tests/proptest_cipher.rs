//! Property-based tests for the claim cipher
//!
//! These tests verify:
//! - Encrypt/decrypt roundtrips for arbitrary UTF-8
//! - Two encryptions of the same plaintext never match (fresh IV)
//! - Malformed blobs never panic and never decrypt to the original
//! - Missing configuration fails both directions

mod common;

use base64::{engine::general_purpose::STANDARD, Engine};
use proptest::prelude::*;
use recipe_auth_core::{AuthError, Cipher, CryptoConfig};

use common::{crypto_config, test_cipher};

// ============================================================================
// Strategies
// ============================================================================

/// Generate strings that are not valid blobs
fn arb_malformed_blob() -> impl Strategy<Value = String> {
    prop_oneof![
        // Not base64 at all
        "[!@#$%^&*()]{1,40}",
        // Valid base64, too short to hold an IV and one block
        prop::collection::vec(any::<u8>(), 0..32).prop_map(|bytes| STANDARD.encode(bytes)),
        // Valid base64, ciphertext not block aligned
        (1usize..16, prop::collection::vec(any::<u8>(), 48))
            .prop_map(|(cut, bytes)| STANDARD.encode(&bytes[cut..])),
    ]
}

// ============================================================================
// Roundtrip Properties
// ============================================================================

proptest! {
    /// Property: decrypt(encrypt(p)) == p
    #[test]
    fn prop_roundtrip(plaintext in ".{0,256}") {
        let cipher = test_cipher();
        let blob = cipher.encrypt(&plaintext).unwrap();
        prop_assert_eq!(cipher.decrypt(&blob).unwrap(), plaintext);
    }

    /// Property: encrypting twice never yields the same blob
    #[test]
    fn prop_fresh_iv_per_call(plaintext in ".{0,64}") {
        let cipher = test_cipher();
        let a = cipher.encrypt(&plaintext).unwrap();
        let b = cipher.encrypt(&plaintext).unwrap();
        prop_assert_ne!(a, b);
    }

    /// Property: blob length is ciphertext (padded to 16) plus a 16 byte IV
    #[test]
    fn prop_blob_length(plaintext in ".{0,128}") {
        let blob = test_cipher().encrypt(&plaintext).unwrap();
        let bytes = STANDARD.decode(blob).unwrap();
        let padded = (plaintext.len() / 16 + 1) * 16;
        prop_assert_eq!(bytes.len(), padded + 16);
    }
}

// ============================================================================
// Failure Properties
// ============================================================================

proptest! {
    /// Property: malformed blobs are rejected with a decryption error
    #[test]
    fn prop_malformed_blob_rejected(blob in arb_malformed_blob()) {
        let result = test_cipher().decrypt(&blob);
        prop_assert_eq!(result, Err(AuthError::Decryption));
    }

    /// Property: flipping a ciphertext bit never yields the original plaintext
    #[test]
    fn prop_tampered_ciphertext_never_roundtrips(
        plaintext in "[a-z0-9-]{8,64}",
        tamper_byte in 0usize..64usize,
        tamper_bit in 0u8..8u8
    ) {
        let cipher = test_cipher();
        let blob = cipher.encrypt(&plaintext).unwrap();
        let mut bytes = STANDARD.decode(&blob).unwrap();
        let ciphertext_len = bytes.len() - 16;
        bytes[tamper_byte % ciphertext_len] ^= 1 << tamper_bit;

        let result = cipher.decrypt(&STANDARD.encode(&bytes));
        prop_assert_ne!(result.ok(), Some(plaintext));
    }

    /// Property: a different key never decrypts to the original plaintext
    #[test]
    fn prop_wrong_key_never_roundtrips(
        plaintext in "[a-z0-9-]{1,64}",
        key in any::<[u8; 32]>()
    ) {
        prop_assume!(key != common::TEST_CRYPTO_KEY);
        let blob = test_cipher().encrypt(&plaintext).unwrap();
        let other = Cipher::new(CryptoConfig::new(key.to_vec(), "aes-256-cbc", 16));
        prop_assert_ne!(other.decrypt(&blob).ok(), Some(plaintext));
    }
}

// ============================================================================
// Configuration Edge Cases
// ============================================================================

#[test]
fn test_unset_key_fails_fast() {
    let blob = test_cipher().encrypt("payload").unwrap();
    let cipher = Cipher::new(CryptoConfig {
        key: Vec::new(),
        ..crypto_config()
    });

    assert_eq!(
        cipher.encrypt("payload"),
        Err(AuthError::Configuration("key not defined".to_string()))
    );
    assert_eq!(
        cipher.decrypt(&blob),
        Err(AuthError::Configuration("key not defined".to_string()))
    );
}

#[test]
fn test_unset_iv_length_fails_fast() {
    let cipher = Cipher::new(CryptoConfig {
        iv_length: 0,
        ..crypto_config()
    });

    assert_eq!(
        cipher.encrypt("payload"),
        Err(AuthError::Configuration("iv length not defined".to_string()))
    );
}

#[test]
fn test_unset_algorithm_fails_fast() {
    let cipher = Cipher::new(CryptoConfig {
        algorithm: String::new(),
        ..crypto_config()
    });

    assert_eq!(
        cipher.decrypt("AAAA"),
        Err(AuthError::Configuration("algorithm not defined".to_string()))
    );
}

#[test]
fn test_blob_survives_surrounding_whitespace() {
    let cipher = test_cipher();
    let blob = cipher.encrypt("trimmed").unwrap();
    assert_eq!(cipher.decrypt(&format!(" {blob}\n")).unwrap(), "trimmed");
}
