//! Access tokens: HS256 JWTs carrying identity only.
//!
//! Workspace roles are deliberately not embedded in tokens -- they are
//! resolved from the membership table on each request, so a role change
//! (or removal from a workspace) takes effect without re-issuing tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attic_core::types::DbId;

/// Payload of every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's database id.
    pub sub: DbId,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Random token id, usable for audit correlation.
    pub jti: String,
}

/// Signing configuration. `JWT_SECRET` must be set; the token lifetime
/// defaults to one hour and can be overridden with
/// `JWT_ACCESS_EXPIRY_MINS`.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load signing configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty; the server must never
    /// start with a guessable signing key.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|raw| raw.parse().expect("JWT_ACCESS_EXPIRY_MINS must be an i64"))
            .unwrap_or(60);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Issue a signed access token for `user_id`.
    pub fn sign(&self, user_id: DbId) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            exp: iat + self.access_token_expiry_mins * 60,
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}
