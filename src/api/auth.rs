// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use tracing::{info, warn};

use crate::{
    auth::{AuthError, LOGIN_TOKEN_TTL},
    error::{ApiError, ErrorBody},
    models::{LoginRequest, TokenResponse},
    state::AppState,
};

/// Exchange the admin username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued (60 minute lifetime)", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 422, description = "Missing form fields", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Form(LoginRequest { username, password }) = form?;

    // Argon2 verification is CPU-bound.
    let credentials = state.credentials.clone();
    let candidate = username.clone();
    let verified =
        tokio::task::spawn_blocking(move || credentials.verify(&candidate, &password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "credential check task failed");
                ApiError::internal("Internal Server Error")
            })?;

    if !verified {
        warn!("admin login rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&username, Some(LOGIN_TOKEN_TTL))?;
    info!(subject = %username, "admin token issued");
    Ok(Json(TokenResponse::bearer(token)))
}
