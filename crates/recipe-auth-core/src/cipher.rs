//! Symmetric encryption of claim payloads
//!
//! Blobs are `base64(ciphertext || iv)`. The IV is drawn from the OS CSPRNG on
//! every call, so encrypting the same plaintext twice never yields the same
//! blob. The ciphertext-then-IV ordering is a wire contract shared with
//! previously issued tokens and must not change.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::{AuthError, CryptoConfig};

/// AES block size in bytes; also the only IV length CBC accepts
const AES_BLOCK_LEN: usize = 16;

/// Supported symmetric algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlgorithm {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
}

impl CipherAlgorithm {
    /// Key size in bytes
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc => 24,
            Self::Aes256Cbc => 32,
        }
    }

    /// IV size in bytes
    pub fn iv_len(self) -> usize {
        AES_BLOCK_LEN
    }

    fn encrypt(self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, AuthError> {
        let invalid = |_| AuthError::config("key or iv length does not match algorithm");
        let ciphertext = match self {
            Self::Aes128Cbc => cbc::Encryptor::<aes::Aes128>::new_from_slices(key, iv)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            Self::Aes192Cbc => cbc::Encryptor::<aes::Aes192>::new_from_slices(key, iv)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            Self::Aes256Cbc => cbc::Encryptor::<aes::Aes256>::new_from_slices(key, iv)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        };
        Ok(ciphertext)
    }

    fn decrypt(self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, AuthError> {
        let invalid = |_| AuthError::config("key or iv length does not match algorithm");
        let plaintext = match self {
            Self::Aes128Cbc => cbc::Decryptor::<aes::Aes128>::new_from_slices(key, iv)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Aes192Cbc => cbc::Decryptor::<aes::Aes192>::new_from_slices(key, iv)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Aes256Cbc => cbc::Decryptor::<aes::Aes256>::new_from_slices(key, iv)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };
        plaintext.map_err(|_| AuthError::Decryption)
    }
}

impl std::str::FromStr for CipherAlgorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-128-cbc" => Ok(Self::Aes128Cbc),
            "aes-192-cbc" => Ok(Self::Aes192Cbc),
            "aes-256-cbc" => Ok(Self::Aes256Cbc),
            other => Err(AuthError::config(format!("unsupported algorithm: {other}"))),
        }
    }
}

impl std::fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aes128Cbc => write!(f, "aes-128-cbc"),
            Self::Aes192Cbc => write!(f, "aes-192-cbc"),
            Self::Aes256Cbc => write!(f, "aes-256-cbc"),
        }
    }
}

/// Encrypts and decrypts opaque strings with the process-wide key.
///
/// CBC carries no MAC, so a standalone blob is not authenticated: a flipped
/// IV byte can decrypt to altered but valid text. Blobs embedded in a token
/// are covered by the token signature.
///
/// Holds only read-only configuration; clones are cheap enough to hand to
/// every request handler and calls never coordinate with each other.
#[derive(Clone)]
pub struct Cipher {
    config: CryptoConfig,
}

impl Cipher {
    /// Create a cipher over the given config.
    ///
    /// The config is checked on every call rather than here, so a missing
    /// value surfaces as [`AuthError::Configuration`] from `encrypt`/`decrypt`.
    /// Call [`CryptoConfig::validate`] at startup to fail earlier.
    pub fn new(config: CryptoConfig) -> Self {
        Self { config }
    }

    /// Encrypt a UTF-8 string into a `base64(ciphertext || iv)` blob
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AuthError> {
        let algorithm = self.config.validate()?;

        let mut iv = vec![0u8; self.config.iv_length];
        OsRng.fill_bytes(&mut iv);

        let mut blob = algorithm.encrypt(&self.config.key, &iv, plaintext.as_bytes())?;
        blob.extend_from_slice(&iv);

        Ok(general_purpose::STANDARD.encode(blob))
    }

    /// Decrypt a blob produced by [`Cipher::encrypt`]
    pub fn decrypt(&self, blob: &str) -> Result<String, AuthError> {
        let algorithm = self.config.validate()?;
        let iv_length = self.config.iv_length;

        let bytes = general_purpose::STANDARD
            .decode(blob.trim())
            .map_err(|_| AuthError::Decryption)?;

        // At least one padded block must precede the IV
        if bytes.len() < iv_length + AES_BLOCK_LEN {
            return Err(AuthError::Decryption);
        }

        let (ciphertext, iv) = bytes.split_at(bytes.len() - iv_length);
        if ciphertext.len() % AES_BLOCK_LEN != 0 {
            return Err(AuthError::Decryption);
        }

        let plaintext = algorithm.decrypt(&self.config.key, iv, ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| AuthError::Decryption)
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher")
            .field("config", &self.config)
            .finish()
    }
}

/// Decode textual key material into exactly `len` bytes.
///
/// Accepts `2 * len` hex characters, URL-safe or standard base64, or a raw
/// string of exactly `len` bytes, tried in that order.
pub fn parse_key_material(raw: &str, len: usize) -> Option<Vec<u8>> {
    let trimmed = raw.trim();

    if trimmed.len() == len * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(trimmed).ok();
    }

    if let Ok(bytes) = general_purpose::URL_SAFE_NO_PAD.decode(trimmed) {
        if bytes.len() == len {
            return Some(bytes);
        }
    }

    if let Ok(bytes) = general_purpose::STANDARD.decode(trimmed) {
        if bytes.len() == len {
            return Some(bytes);
        }
    }

    let raw_bytes = trimmed.as_bytes();
    if raw_bytes.len() == len {
        return Some(raw_bytes.to_vec());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> Cipher {
        Cipher::new(CryptoConfig::new(vec![0x42u8; 32], "aes-256-cbc", 16))
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = test_cipher();
        let blob = cipher.encrypt("9aa98e23-24ec-4403-8517-ca27968cfe25").unwrap();
        assert_eq!(
            cipher.decrypt(&blob).unwrap(),
            "9aa98e23-24ec-4403-8517-ca27968cfe25"
        );
    }

    #[test]
    fn test_encrypt_is_not_deterministic() {
        let cipher = test_cipher();
        let a = cipher.encrypt("same plaintext").unwrap();
        let b = cipher.encrypt("same plaintext").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_blob_layout_is_ciphertext_then_iv() {
        let cipher = test_cipher();
        let blob = cipher.encrypt("layout").unwrap();
        let bytes = general_purpose::STANDARD.decode(&blob).unwrap();
        // "layout" pads to a single block, followed by the 16 byte IV
        assert_eq!(bytes.len(), AES_BLOCK_LEN + 16);

        let (ciphertext, iv) = bytes.split_at(bytes.len() - 16);
        let plaintext = CipherAlgorithm::Aes256Cbc
            .decrypt(&[0x42u8; 32], iv, ciphertext)
            .unwrap();
        assert_eq!(plaintext, b"layout");
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let cipher = test_cipher();
        let blob = cipher.encrypt("").unwrap();
        assert_eq!(cipher.decrypt(&blob).unwrap(), "");
    }

    #[test]
    fn test_all_key_sizes() {
        for (alg, len) in [("aes-128-cbc", 16), ("aes-192-cbc", 24), ("AES-256-CBC", 32)] {
            let cipher = Cipher::new(CryptoConfig::new(vec![1u8; len], alg, 16));
            let blob = cipher.encrypt("recipe").unwrap();
            assert_eq!(cipher.decrypt(&blob).unwrap(), "recipe");
        }
    }

    #[test]
    fn test_unsupported_algorithm() {
        let result: Result<CipherAlgorithm, _> = "des-ede3-cbc".parse();
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_missing_config_fails_both_directions() {
        let configs = [
            CryptoConfig::new(Vec::new(), "aes-256-cbc", 16),
            CryptoConfig::new(vec![0x42u8; 32], "aes-256-cbc", 0),
            CryptoConfig::new(vec![0x42u8; 32], "", 16),
        ];
        let blob = test_cipher().encrypt("payload").unwrap();

        for config in configs {
            let cipher = Cipher::new(config);
            assert!(matches!(cipher.encrypt("payload"), Err(AuthError::Configuration(_))));
            assert!(matches!(cipher.decrypt(&blob), Err(AuthError::Configuration(_))));
        }
    }

    #[test]
    fn test_malformed_blobs_rejected() {
        let cipher = test_cipher();
        assert_eq!(cipher.decrypt("not base64!!"), Err(AuthError::Decryption));
        assert_eq!(cipher.decrypt(""), Err(AuthError::Decryption));

        // IV only, no ciphertext
        let iv_only = general_purpose::STANDARD.encode([0u8; 16]);
        assert_eq!(cipher.decrypt(&iv_only), Err(AuthError::Decryption));

        // Ciphertext not aligned to the block size
        let unaligned = general_purpose::STANDARD.encode([0u8; 16 + 16 + 3]);
        assert_eq!(cipher.decrypt(&unaligned), Err(AuthError::Decryption));
    }

    #[test]
    fn test_wrong_key_never_returns_plaintext() {
        let blob = test_cipher().encrypt("the secret subject").unwrap();
        let other = Cipher::new(CryptoConfig::new(vec![0x43u8; 32], "aes-256-cbc", 16));
        assert_ne!(other.decrypt(&blob).ok().as_deref(), Some("the secret subject"));
    }

    #[test]
    fn test_standalone_blob_is_malleable_through_iv() {
        let cipher = test_cipher();
        let blob = cipher.encrypt("abcdef").unwrap();

        let mut bytes = general_purpose::STANDARD.decode(&blob).unwrap();
        let iv_start = bytes.len() - 16;
        bytes[iv_start] ^= b'a' ^ b'b';
        let tampered = general_purpose::STANDARD.encode(&bytes);

        // No MAC on the blob itself
        assert_eq!(cipher.decrypt(&tampered).unwrap(), "bbcdef");
    }

    #[test]
    fn test_parse_key_material_formats() {
        let hex = "000102030405060708090a0b0c0d0e0f";
        assert_eq!(parse_key_material(hex, 16), Some((0u8..16).collect()));
        let upper = "000102030405060708090A0B0C0D0E0F";
        assert_eq!(parse_key_material(upper, 16), Some((0u8..16).collect()));

        let b64 = general_purpose::STANDARD.encode([9u8; 32]);
        assert_eq!(parse_key_material(&b64, 32), Some(vec![9u8; 32]));

        let b64_url = general_purpose::URL_SAFE_NO_PAD.encode([0xfbu8; 24]);
        assert_eq!(parse_key_material(&b64_url, 24), Some(vec![0xfbu8; 24]));

        assert_eq!(parse_key_material("short", 32), None);
    }
}
