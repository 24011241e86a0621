// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by an access token.
///
/// Tokens are never stored; validity is purely a function of the signature
/// and `exp` at verification time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the admin username)
    pub sub: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, issued_at: i64, expires_at: i64) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at,
            exp: expires_at,
        }
    }

    /// Expired at `now` when `now >= exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let claims = Claims::new("admin", 1_700_000_000, 1_700_003_600);
        assert!(!claims.is_expired_at(1_700_003_599));
        assert!(claims.is_expired_at(1_700_003_600));
        assert!(claims.is_expired_at(1_700_003_601));
    }
}
