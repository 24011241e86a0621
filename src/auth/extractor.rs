// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated requests.
//!
//! Use the `Auth` extractor in handlers to require a valid access token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims.sub is the admin username
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, Claims};
use crate::state::AppState;

/// Extractor for requests carrying a valid bearer token.
pub struct Auth(pub Claims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = state.tokens.verify(token)?;
        Ok(Auth(claims))
    }
}

/// Token from an `Authorization: Bearer <token>` header (scheme is case-insensitive).
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LOGIN_TOKEN_TTL;
    use crate::test_support::TestApp;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/contacts");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let app = TestApp::spawn().await;
        let mut parts = parts_with_auth(None);

        let result = Auth::from_request_parts(&mut parts, &app.state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_other_schemes() {
        let app = TestApp::spawn().await;
        let mut parts = parts_with_auth(Some("Basic YWRtaW46aHVudGVyMg=="));

        let result = Auth::from_request_parts(&mut parts, &app.state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_issued_token() {
        let app = TestApp::spawn().await;
        let token = app.state.tokens.issue("admin", Some(LOGIN_TOKEN_TTL)).unwrap();
        let mut parts = parts_with_auth(Some(&format!("bearer {token}")));

        let Auth(claims) = Auth::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_invalid_token() {
        let app = TestApp::spawn().await;
        let mut parts = parts_with_auth(Some("Bearer not.a.token"));

        let result = Auth::from_request_parts(&mut parts, &app.state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
