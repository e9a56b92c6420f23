//! Bearer token issuance and verification (HS256 JWT).
//!
//! Tokens carry the user id and role; the extractor still loads the
//! account row on every request, so deactivating an account takes
//! effect immediately rather than at token expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use studyhall_types::error::AuthError;
use studyhall_types::user::User;

/// Claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Role at issuance time (informational; authorization re-reads the row).
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Signs and verifies access tokens with a shared HS256 secret.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtCodec {
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// Issue an access token for the user.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::InvalidToken)?
            .as_secs();

        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
