//! Session token issuance and validation
//!
//! Tokens are HS256 JWTs carrying the account username as `sub`. They are
//! stateless: validity is decided by signature and expiry alone.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use clinic_shared::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed JWT keys, shared across handlers
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    ttl_secs: i64,
}

impl JwtService {
    /// Create a service from the signing secret and token lifetime.
    ///
    /// Call once at startup and keep it in `AppState`.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is dead the second its TTL runs out.
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            ttl_secs,
        }
    }

    /// Issue a token for `subject`, expiring one TTL from now
    #[inline]
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (issued_at + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Validate a token and return its subject
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            debug!(reason = %e, "Rejected session token");
            AuthError::InvalidToken
        })?;

        match data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => {
                debug!("Rejected session token without subject");
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}
