// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for handler and router tests.

use std::{
    net::{IpAddr, SocketAddr},
    sync::LazyLock,
    time::Duration,
};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use axum::{
    body::{to_bytes, Body},
    extract::connect_info::MockConnectInfo,
    http::{HeaderValue, Request, Response},
    Router,
};
use mockito::{Mock, ServerGuard};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    api::{router, RouterSettings},
    auth::{AdminCredentials, TokenService},
    providers::{http_client, BrevoMailer, MailSettings, RecaptchaVerifier},
    rate_limit::ContactRateLimiter,
    state::AppState,
    storage::ContactStore,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "hunter2";
pub const SIGNING_SECRET: &[u8] = b"test-signing-secret";
pub const CLIENT_ADDR: ([u8; 4], u16) = ([203, 0, 113, 7], 40000);

// Low-cost parameters keep the suite fast; verification reads them from the PHC string.
static ADMIN_PASSWORD_HASH: LazyLock<String> = LazyLock::new(|| {
    let params = Params::new(1024, 1, 1, None).unwrap();
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string()
});

/// A fully wired application backed by a temporary database and mock providers.
pub struct TestApp {
    pub state: AppState,
    pub captcha: ServerGuard,
    pub mail: ServerGuard,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::build(true).await
    }

    /// Same as [`TestApp::spawn`] but without a recipient address.
    pub async fn spawn_without_mail() -> Self {
        Self::build(false).await
    }

    /// Same as [`TestApp::spawn`] but the connecting peer is a trusted proxy.
    pub async fn spawn_behind_proxy() -> Self {
        let mut app = Self::build(true).await;
        app.state = app
            .state
            .clone()
            .with_trusted_proxies(vec![IpAddr::from(CLIENT_ADDR.0)]);
        app
    }

    async fn build(mail_configured: bool) -> Self {
        let captcha = mockito::Server::new_async().await;
        let mail = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        let http = http_client(Duration::from_secs(5)).unwrap();
        let contacts = ContactStore::open(&dir.path().join("contacts.redb")).unwrap();
        let settings = MailSettings {
            api_key: Some("brevo-test-key".to_string()),
            sender: Some("site@example.com".to_string()),
            recipient: mail_configured.then(|| "owner@example.com".to_string()),
        };

        let state = AppState::new(
            AdminCredentials::new(
                Some(ADMIN_USERNAME.to_string()),
                Some(ADMIN_PASSWORD_HASH.clone()),
            ),
            TokenService::new(SIGNING_SECRET),
            contacts,
            ContactRateLimiter::for_contact_form(),
            RecaptchaVerifier::new(
                http.clone(),
                format!("{}/siteverify", captcha.url()),
                "captcha-secret",
            ),
            BrevoMailer::new(http, mail.url(), settings),
        );

        Self {
            state,
            captcha,
            mail,
            _dir: dir,
        }
    }

    /// Router with a fixed client address, as if served over TCP.
    pub fn router(&self) -> Router {
        let settings = RouterSettings {
            allowed_origins: vec![HeaderValue::from_static("https://localhost:5173")],
            expose_docs: false,
        };
        router(self.state.clone(), &settings)
            .layer(MockConnectInfo(SocketAddr::from(CLIENT_ADDR)))
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Mock `siteverify` answering with `body`.
    pub async fn captcha_responds(&mut self, body: &str) -> Mock {
        self.captcha
            .mock("POST", "/siteverify")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock Brevo send endpoint answering with `status`.
    pub async fn mail_responds(&mut self, status: usize) -> Mock {
        self.mail
            .mock("POST", "/v3/smtp/email")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messageId":"<test@smtp-relay.brevo.com>"}"#)
            .create_async()
            .await
    }

    pub fn admin_token(&self) -> String {
        self.state
            .tokens
            .issue(ADMIN_USERNAME, Some(crate::auth::LOGIN_TOKEN_TTL))
            .unwrap()
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn contact_request(body: serde_json::Value, captcha_token: Option<&str>) -> Request<Body> {
    contact_request_builder(captcha_token)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Contact request relayed by a proxy on behalf of `client`.
pub fn forwarded_contact_request(body: serde_json::Value, client: &str) -> Request<Body> {
    contact_request_builder(Some("client-token"))
        .header("x-forwarded-for", client)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn contact_request_builder(captcha_token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/contact")
        .header("content-type", "application/json");
    if let Some(token) = captcha_token {
        builder = builder.header("recaptcha-token", token);
    }
    builder
}
