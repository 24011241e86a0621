// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance and verification (HS256).

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::{AuthError, Claims};

/// Lifetime of a token when the caller does not ask for one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Lifetime of tokens issued by `POST /login`.
pub const LOGIN_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Issues and verifies signed, expiring bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a new `TokenService` with the given HMAC secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against an explicit clock with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject`, valid for `ttl` (15 minutes if `None`).
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, AuthError> {
        self.issue_at(subject, ttl, now_secs())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Option<Duration>,
        now: i64,
    ) -> Result<String, AuthError> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims::new(subject, now, now.saturating_add(ttl_secs));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::TokenIssue)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, now_secs())
    }

    /// Verify as if the current time were `now` (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(reason = ?e.kind(), "access token rejected");
            AuthError::InvalidToken
        })?;

        if data.claims.is_expired_at(now) {
            debug!(exp = data.claims.exp, now, "access token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}
