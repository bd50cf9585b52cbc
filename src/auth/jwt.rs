//! JWT Token Handler
//! Issues and verifies HMAC-signed session tokens

use crate::auth::{middleware::AuthError, models::Claims};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};

/// Default token lifetime
pub const DEFAULT_TTL_HOURS: i64 = 72;

/// Longest accepted token lifetime (one year)
pub const MAX_TTL_HOURS: i64 = 24 * 365;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a handler signing with `secret`, issuing tokens valid for `ttl_hours`.
    ///
    /// The lifetime is clamped to `1..=MAX_TTL_HOURS`.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        let clamped = ttl_hours.clamp(1, MAX_TTL_HOURS);
        if clamped != ttl_hours {
            warn!("Token TTL {}h out of range, using {}h", ttl_hours, clamped);
        }
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(clamped),
        }
    }

    /// Sign a token whose subject is `login`
    pub fn issue(&self, login: &str) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;

        let claims = Claims {
            sub: login.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!("Issuing JWT for {}, expires {}", login, expiration);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to generate JWT")
    }

    /// Check signature and expiry, returning the subject login
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        let decoded = decode::<serde_json::Value>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        match decoded.claims.get("sub") {
            Some(serde_json::Value::String(sub)) => Ok(sub.clone()),
            _ => Err(AuthError::MalformedClaims),
        }
    }
}
