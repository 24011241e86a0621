// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::IpAddr, sync::Arc};

use tracing::info;

use crate::{
    auth::{AdminCredentials, TokenService},
    config::Config,
    error::StartupError,
    providers::{self, BrevoMailer, RecaptchaVerifier},
    rate_limit::ContactRateLimiter,
    storage::ContactStore,
};

/// Shared handler state. Every component is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<AdminCredentials>,
    pub tokens: TokenService,
    pub contacts: ContactStore,
    pub rate_limiter: Arc<ContactRateLimiter>,
    pub recaptcha: RecaptchaVerifier,
    pub mailer: BrevoMailer,
    /// Peers whose `X-Forwarded-For` header identifies the client.
    pub trusted_proxies: Arc<[IpAddr]>,
}

impl AppState {
    pub fn new(
        credentials: AdminCredentials,
        tokens: TokenService,
        contacts: ContactStore,
        rate_limiter: ContactRateLimiter,
        recaptcha: RecaptchaVerifier,
        mailer: BrevoMailer,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            tokens,
            contacts,
            rate_limiter: Arc::new(rate_limiter),
            recaptcha,
            mailer,
            trusted_proxies: Arc::from(Vec::new()),
        }
    }

    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = Arc::from(proxies);
        self
    }

    /// Wire every component from the loaded configuration.
    ///
    /// Opens (and if needed creates) the database file.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let http = providers::http_client(config.http_timeout)?;

        let contacts = ContactStore::open(&config.database_path)?;
        info!(path = %config.database_path.display(), "contact store opened");

        if config.admin_username.is_none() || config.admin_password_hash.is_none() {
            tracing::warn!("admin credentials are not configured; every login will fail");
        }
        if !config.mail.is_complete() {
            tracing::warn!("email relay is not fully configured; contact submissions will fail");
        }

        Ok(Self::new(
            AdminCredentials::new(
                config.admin_username.clone(),
                config.admin_password_hash.clone(),
            ),
            TokenService::new(config.secret_key.as_bytes()),
            contacts,
            ContactRateLimiter::for_contact_form(),
            RecaptchaVerifier::new(
                http.clone(),
                config.recaptcha_verify_url.clone(),
                config.recaptcha_secret.clone(),
            ),
            BrevoMailer::new(http, config.brevo_api_url.clone(), config.mail.clone()),
        )
        .with_trusted_proxies(config.trusted_proxies.clone()))
    }
}
