//! Bearer token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`), the login, and the
//! issue/expiry timestamps. Expiry is checked against the injected clock so
//! that it can be driven in tests; the library's own `exp` check is disabled.

use crate::core::error::TokenError;
use crate::utils::time::{is_expired, Clock, SECONDS_PER_HOUR};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest lifetime the configuration accepts (one leap year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 366 * 24;

/// Minimum accepted length of the signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Payload stored in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub login: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_hours: i64, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds: ttl_hours.saturating_mul(SECONDS_PER_HOUR),
            clock,
        }
    }

    pub fn issue(&self, user_id: &str, login: &str) -> Result<String, TokenError> {
        let now = self.clock.now();
        let exp = now
            .checked_add(self.ttl_seconds)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            login: login.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        if is_expired(claims.exp, self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}
