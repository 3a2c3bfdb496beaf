//! Access Boundary: HS256 bearer tokens
//!
//! Built from an explicit secret handed down by the daemon. Credential
//! storage and sign-in live elsewhere; this only verifies and (for
//! tooling) issues tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use waitlist_core::domain::{Caller, UserId};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::AccessBoundary;

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per JWT convention
    pub sub: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

pub struct JwtAccessBoundary {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAccessBoundary {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Sign a token for `caller` valid for `ttl`
    pub fn issue(&self, caller: Caller, ttl: chrono::Duration) -> Result<String> {
        let claims = Claims {
            sub: caller.user_id.to_string(),
            is_admin: caller.is_admin,
            exp: (chrono::Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

impl AccessBoundary for JwtAccessBoundary {
    fn resolve(&self, bearer_token: &str) -> Result<Caller> {
        let token = bearer_token
            .strip_prefix("Bearer ")
            .unwrap_or(bearer_token)
            .trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("Missing access token".to_string()));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid access token: {}", e)))?;

        let user_id: UserId = data.claims.sub.parse().map_err(|_| {
            AppError::Unauthorized(format!("Invalid subject in token: {}", data.claims.sub))
        })?;

        Ok(Caller::new(user_id, data.claims.is_admin))
    }
}
