// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Span};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    error::{ErrorBody, FieldError, StartupError},
    models::{ContactRequest, ContactResponse, ContactSubmission, LoginRequest, TokenResponse},
    state::AppState,
};

pub mod auth;
pub mod contact;
pub mod contacts;
pub mod extract;
pub mod health;

/// Router options that come from configuration rather than state.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Origins allowed by CORS (credentials included).
    pub allowed_origins: Vec<HeaderValue>,
    /// Mount Swagger UI, ReDoc and the OpenAPI document.
    pub expose_docs: bool,
}

impl RouterSettings {
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let allowed_origins = config
            .frontend_urls
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| StartupError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            allowed_origins,
            expose_docs: config.is_dev,
        })
    }
}

pub fn router(state: AppState, settings: &RouterSettings) -> Router {
    let routes = Router::new()
        .route("/login", post(auth::login))
        .route("/contact", post(contact::submit_contact))
        .route("/contacts", get(contacts::list_contacts))
        .route("/contacts/{id}", get(contacts::get_contact))
        .route("/health", get(health::health))
        .with_state(state);

    let routes = if settings.expose_docs {
        routes
            .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
            .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
    } else {
        routes
    };

    // Credentialed CORS cannot use wildcards; mirror the preflight instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(settings.allowed_origins.clone()))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    routes
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    info_span!(
        "http-request",
        method = %request.method(),
        path = request.uri().path(),
        request_id
    )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        contact::submit_contact,
        contacts::list_contacts,
        contacts::get_contact,
        health::health
    ),
    components(
        schemas(
            ContactRequest,
            ContactResponse,
            ContactSubmission,
            LoginRequest,
            TokenResponse,
            ErrorBody,
            FieldError,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Admin login"),
        (name = "Contact", description = "Public contact form"),
        (name = "Contacts", description = "Stored submissions (admin only)"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
