// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Contact store readability ("ok" or "unavailable").
    pub storage: String,
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    // Only readability is reported; the count stays private to admins.
    let storage_ok = match state.contacts.stored_count().await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "health check could not read the contact store");
            false
        }
    };

    let response = ReadyResponse {
        status: if storage_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            storage: if storage_ok { "ok" } else { "unavailable" }.to_string(),
        },
    };

    let status = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::ContactForm,
        test_support::{json_body, TestApp},
    };
    use axum::{body::Body, http::Request};
    use serde_json::json;

    #[tokio::test]
    async fn healthy_store_reports_ok() {
        let app = TestApp::spawn().await;

        let (status, Json(body)) = health(State(app.state.clone())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.checks.storage, "ok");
    }

    #[tokio::test]
    async fn health_does_not_disclose_submission_count() {
        let app = TestApp::spawn().await;
        app.state
            .contacts
            .create(ContactForm {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                message: "Hi".to_string(),
            })
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.request(request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "ok", "checks": {"service": "ok", "storage": "ok"}})
        );
    }
}
