// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody, FieldError},
    models::ContactSubmission,
    state::AppState,
};

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 200;

/// Query parameters for the submission list.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListContactsQuery {
    /// Maximum number of results (1-200, default: 50)
    #[param(default = 50, minimum = 1, maximum = 200)]
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/contacts",
    params(ListContactsQuery),
    tag = "Contacts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stored submissions, newest first", body = [ContactSubmission]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 422, description = "Limit out of range", body = ErrorBody)
    )
)]
pub async fn list_contacts(
    Auth(claims): Auth,
    State(state): State<AppState>,
    query: Result<Query<ListContactsQuery>, QueryRejection>,
) -> Result<Json<Vec<ContactSubmission>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ApiError::validation(vec![FieldError::new(
            "limit",
            format!("must be between 1 and {MAX_LIST_LIMIT}"),
        )]));
    }

    let contacts = state.contacts.recent(limit).await?;
    debug!(subject = %claims.sub, count = contacts.len(), "listed contact submissions");
    Ok(Json(contacts))
}

#[utoipa::path(
    get,
    path = "/contacts/{id}",
    params(
        ("id" = u64, Path, description = "Submission identifier")
    ),
    tag = "Contacts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ContactSubmission),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No submission with this id", body = ErrorBody)
    )
)]
pub async fn get_contact(
    Auth(_claims): Auth,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ContactSubmission>, ApiError> {
    let Path(id) = id?;
    state
        .contacts
        .fetch(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Contact {id} not found")))
}
