//! Signed, expiring access and refresh tokens
//!
//! Access tokens are short-lived and carry the refresh token string in
//! their payload; refresh tokens are long-lived and carry the user id.
//! Both are HS256 JWTs signed with a shared secret.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Opaque payload: the user id for refresh tokens, the refresh token
    /// string for access tokens.
    pub data: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies signed tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: an expired token must fail verification immediately
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a refresh token carrying the user's id.
    pub fn issue_refresh(&self, user_id: i64) -> Result<String, TokenError> {
        self.sign_with_ttl(user_id.to_string(), Duration::days(REFRESH_TOKEN_TTL_DAYS))
    }

    /// Issue an access token derived from a refresh token.
    pub fn issue_access(&self, refresh_token: &str) -> Result<String, TokenError> {
        self.sign_with_ttl(
            refresh_token.to_string(),
            Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
        )
    }

    /// Sign an arbitrary payload with an explicit lifetime.
    ///
    /// A negative `ttl` produces an already-expired token.
    pub fn sign_with_ttl(&self, data: String, ttl: Duration) -> Result<String, TokenError> {
        let claims = TokenClaims {
            data,
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
