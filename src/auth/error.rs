// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication error type.
///
/// Token verification deliberately collapses every decoding failure into
/// [`AuthError::InvalidToken`] so callers cannot tell a forged token from an
/// expired one.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header
    #[error("Not authenticated")]
    MissingToken,
    /// Username or password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Bad signature, expired, or malformed token
    #[error("Invalid or expired token")]
    InvalidToken,
    /// Signing failed while issuing a token
    #[error("Could not issue access token")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidCredentials | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err.status_code() {
            StatusCode::UNAUTHORIZED => ApiError::unauthorized(err.to_string()),
            status => {
                tracing::error!(error = ?err, "token issuance failed");
                ApiError::new(status, err.to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::header::WWW_AUTHENTICATE};

    #[tokio::test]
    async fn invalid_token_returns_401_with_challenge() {
        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["detail"], "Invalid or expired token");
    }

    #[test]
    fn credential_errors_are_unauthorized() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
    }
}
