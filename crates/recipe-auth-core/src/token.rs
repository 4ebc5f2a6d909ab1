//! JWT issuance and verification
//!
//! Claims are signed directly with an HMAC algorithm (HS512 unless configured
//! otherwise). Timestamps are epoch seconds. Verification is purely local:
//! no revocation list, so a token stays valid for its whole lifetime.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthConfig, AuthError, Cipher, SigningConfig};

/// What a token authorizes its bearer to do.
///
/// Serialized as its integer discriminant. `None` is a sentinel that no
/// well-formed token carries; it is rejected by name, never by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TokenType {
    None = 0,
    Activation = 1,
    Access = 2,
}

impl From<TokenType> for u8 {
    fn from(token_type: TokenType) -> Self {
        token_type as u8
    }
}

impl TryFrom<u8> for TokenType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Activation),
            2 => Ok(Self::Access),
            other => Err(format!("unknown token type: {other}")),
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Activation => write!(f, "activation"),
            Self::Access => write!(f, "access"),
        }
    }
}

/// Validity of a token's time window relative to some instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// `now < nbf`
    Pending,
    /// `nbf <= now < exp`
    Valid,
    /// `now >= exp`
    Expired,
}

/// Claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (opaque user identifier)
    pub sub: String,
    /// Token type
    pub typ: TokenType,
    /// Issued at (seconds)
    pub iat: i64,
    /// Not before (seconds)
    pub nbf: i64,
    /// Expiration (seconds)
    pub exp: i64,
    /// Unique token id, for tracing a token through logs
    pub jti: String,
    /// Encrypted extra data, see [`TokenIssuer::reveal_extra`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

impl TokenClaims {
    /// Where `now` falls in the token's validity window
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        let now = now.timestamp();
        if now < self.nbf {
            TokenState::Pending
        } else if now >= self.exp {
            TokenState::Expired
        } else {
            TokenState::Valid
        }
    }

    /// Reject the claims unless they carry `expected`
    pub fn require_type(&self, expected: TokenType) -> Result<(), AuthError> {
        if self.typ == expected {
            Ok(())
        } else {
            Err(AuthError::WrongTokenType {
                expected,
                actual: self.typ,
            })
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.iat)
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.nbf)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Optional inputs to [`TokenIssuer::encode_with`]
#[derive(Debug, Clone, Default)]
pub struct TokenOptions {
    /// Defaults to now + the type's configured lifetime
    pub expires_at: Option<DateTime<Utc>>,
    /// Defaults to now
    pub not_before: Option<DateTime<Utc>>,
    /// Plaintext to encrypt into the `ext` claim
    pub extra: Option<String>,
}

impl TokenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set expiry
    #[must_use]
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Set not-before
    #[must_use]
    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self
    }

    /// Attach extra data, encrypted before signing
    #[must_use]
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

/// Issues and verifies signed tokens.
///
/// Security properties:
/// - Only the configured HMAC algorithm is accepted on verification
/// - Signature failures, malformed tokens and unknown types all collapse to
///   [`AuthError::InvalidToken`] so callers get no verification oracle
/// - Expiry and not-before are checked with zero leeway
#[derive(Clone)]
pub struct TokenIssuer {
    signing: SigningConfig,
    cipher: Cipher,
    header: Header,
    validation: Validation,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// Like [`Cipher::new`] this never fails; a missing secret is reported
    /// by `encode`/`decode`. Use [`AuthConfig::validate`] at startup.
    pub fn new(config: AuthConfig) -> Self {
        let AuthConfig { crypto, signing } = config;

        let mut validation = Validation::new(signing.algorithm);
        validation.leeway = 0;
        // Time checks happen in `decode` so expiry and not-before get
        // distinct errors with exact boundaries
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "exp", "nbf"]);

        Self {
            header: Header::new(signing.algorithm),
            encoding_key: EncodingKey::from_secret(&signing.secret),
            decoding_key: DecodingKey::from_secret(&signing.secret),
            validation,
            cipher: Cipher::new(crypto),
            signing,
        }
    }

    /// The cipher used for the `ext` claim
    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// Encode a token for `subject_id`.
    ///
    /// `expires_at` defaults to now plus the configured lifetime for
    /// `token_type` (24 hours unless changed); `not_before` defaults to now.
    pub fn encode(
        &self,
        subject_id: &str,
        token_type: TokenType,
        expires_at: Option<DateTime<Utc>>,
        not_before: Option<DateTime<Utc>>,
    ) -> Result<String, AuthError> {
        let options = TokenOptions {
            expires_at,
            not_before,
            extra: None,
        };
        self.encode_with(subject_id, token_type, options)
    }

    /// Encode a token with the full set of options
    pub fn encode_with(
        &self,
        subject_id: &str,
        token_type: TokenType,
        options: TokenOptions,
    ) -> Result<String, AuthError> {
        self.signing.validate()?;

        if subject_id.trim().is_empty() {
            return Err(AuthError::input("subject id is empty"));
        }
        if token_type == TokenType::None {
            return Err(AuthError::input("token type NONE cannot be issued"));
        }

        let now = Utc::now();
        let ttl = ChronoDuration::from_std(self.default_ttl(token_type))
            .map_err(|_| AuthError::config("token lifetime out of range"))?;

        let default_exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::config("token lifetime out of range"))?;

        let ext = options
            .extra
            .map(|extra| self.cipher.encrypt(&extra))
            .transpose()?;

        let claims = TokenClaims {
            sub: subject_id.to_string(),
            typ: token_type,
            iat: now.timestamp(),
            nbf: options.not_before.unwrap_or(now).timestamp(),
            exp: options.expires_at.unwrap_or(default_exp).timestamp(),
            jti: Uuid::new_v4().to_string(),
            ext,
        };

        let token =
            jsonwebtoken::encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
                tracing::error!("Failed to sign token: {}", e);
                AuthError::config("failed to sign token")
            })?;

        tracing::debug!(jti = %claims.jti, token_type = %token_type, "Issued token");
        Ok(token)
    }

    /// Issue an access token with the default lifetime
    pub fn issue_access(&self, subject_id: &str) -> Result<String, AuthError> {
        self.encode(subject_id, TokenType::Access, None, None)
    }

    /// Issue an activation token with the default lifetime
    pub fn issue_activation(&self, subject_id: &str) -> Result<String, AuthError> {
        self.encode(subject_id, TokenType::Activation, None, None)
    }

    /// Verify a token's signature and validity window and return its claims
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.signing.validate()?;

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::input("token is empty"));
        }

        let token_data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|e| {
                    tracing::debug!("Token verification failed: {}", e);
                    AuthError::InvalidToken
                })?;

        let claims = token_data.claims;

        if claims.typ == TokenType::None || claims.sub.is_empty() {
            tracing::debug!(jti = %claims.jti, "Token carries sentinel type or empty subject");
            return Err(AuthError::InvalidToken);
        }

        match claims.state_at(Utc::now()) {
            TokenState::Pending => Err(AuthError::TokenNotYetValid),
            TokenState::Expired => Err(AuthError::TokenExpired),
            TokenState::Valid => Ok(claims),
        }
    }

    /// [`TokenIssuer::decode`] and require a specific token type
    pub fn decode_as(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError> {
        let claims = self.decode(token)?;
        claims.require_type(expected)?;
        Ok(claims)
    }

    /// Decrypt the `ext` claim, if present
    pub fn reveal_extra(&self, claims: &TokenClaims) -> Result<Option<String>, AuthError> {
        claims
            .ext
            .as_deref()
            .map(|blob| self.cipher.decrypt(blob))
            .transpose()
    }

    fn default_ttl(&self, token_type: TokenType) -> std::time::Duration {
        match token_type {
            TokenType::Activation => self.signing.activation_ttl,
            TokenType::Access | TokenType::None => self.signing.access_ttl,
        }
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("signing", &self.signing)
            .field("cipher", &self.cipher)
            .finish_non_exhaustive()
    }
}
