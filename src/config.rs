// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`Config`] struct built from them. Configuration is read once at startup
//! and validated eagerly: a missing required value stops the process before
//! the listener is bound.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MY_SECRET_KEY` | HMAC secret used to sign access tokens | Required |
//! | `ADMIN_USERNAME` | Admin login name | Unset (login always fails) |
//! | `ADMIN_PASSWORD_HASH` | Argon2 PHC hash of the admin password | Unset (login always fails) |
//! | `FRONTEND_URLS` | Comma-separated CORS origins | `https://localhost:5173` |
//! | `IS_DEV` | Expose Swagger UI at `/docs` | `false` |
//! | `RECAPTCHA_SECRET_KEY` | reCAPTCHA server secret | Required |
//! | `RECAPTCHA_VERIFY_URL` | reCAPTCHA verification endpoint | Google `siteverify` |
//! | `BREVO_API_KEY` | Brevo transactional email API key | Unset |
//! | `BREVO_API_URL` | Brevo API base URL | `https://api.brevo.com` |
//! | `MAIL_FROM` | Sender address for notifications | Unset |
//! | `MAIL_RECEIVER` | Recipient address for notifications | Unset |
//! | `DATABASE_PATH` | redb database file | `data/portfolio.redb` |
//! | `TRUSTED_PROXIES` | Comma-separated peer IPs whose `X-Forwarded-For` is honored | `127.0.0.1,::1` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `HTTP_TIMEOUT_SECS` | Timeout for outbound HTTP calls | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Missing mail settings do not stop startup. The contact endpoint fails
//! closed with a 500 when it tries to send with an incomplete relay config.

use std::{net::IpAddr, path::PathBuf, time::Duration};

use crate::providers::{brevo, recaptcha, MailSettings};

pub const SECRET_KEY_ENV: &str = "MY_SECRET_KEY";
pub const ADMIN_USERNAME_ENV: &str = "ADMIN_USERNAME";
pub const ADMIN_PASSWORD_HASH_ENV: &str = "ADMIN_PASSWORD_HASH";
pub const FRONTEND_URLS_ENV: &str = "FRONTEND_URLS";
pub const IS_DEV_ENV: &str = "IS_DEV";
pub const RECAPTCHA_SECRET_ENV: &str = "RECAPTCHA_SECRET_KEY";
pub const RECAPTCHA_VERIFY_URL_ENV: &str = "RECAPTCHA_VERIFY_URL";
pub const BREVO_API_KEY_ENV: &str = "BREVO_API_KEY";
pub const BREVO_API_URL_ENV: &str = "BREVO_API_URL";
pub const MAIL_FROM_ENV: &str = "MAIL_FROM";
pub const MAIL_RECEIVER_ENV: &str = "MAIL_RECEIVER";

/// Environment variable name for the redb database file.
///
/// The parent directory is created on startup if it does not exist.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const TRUSTED_PROXIES_ENV: &str = "TRUSTED_PROXIES";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const HTTP_TIMEOUT_ENV: &str = "HTTP_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_FRONTEND_URLS: &str = "https://localhost:5173";
pub const DEFAULT_DATABASE_PATH: &str = "data/portfolio.redb";
pub const DEFAULT_TRUSTED_PROXIES: &str = "127.0.0.1,::1";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Process configuration, populated once at startup.
///
/// Secrets live here as plain strings; this type intentionally does not
/// implement `Debug`.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub secret_key: String,
    pub admin_username: Option<String>,
    pub admin_password_hash: Option<String>,
    pub frontend_urls: Vec<String>,
    /// Reverse proxies allowed to report the client address.
    pub trusted_proxies: Vec<IpAddr>,
    pub is_dev: bool,
    pub recaptcha_secret: String,
    pub recaptcha_verify_url: String,
    pub brevo_api_url: String,
    pub mail: MailSettings,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty and whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let http_timeout = match get(HTTP_TIMEOUT_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        name: HTTP_TIMEOUT_ENV,
                        reason: "timeout must be at least one second".to_string(),
                    })
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: HTTP_TIMEOUT_ENV,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                })
            }
        };

        let frontend_urls = split_list(
            &get(FRONTEND_URLS_ENV).unwrap_or_else(|| DEFAULT_FRONTEND_URLS.to_string()),
        );

        let trusted_proxies = split_list(
            &get(TRUSTED_PROXIES_ENV).unwrap_or_else(|| DEFAULT_TRUSTED_PROXIES.to_string()),
        )
        .iter()
        .map(|raw| {
            raw.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                name: TRUSTED_PROXIES_ENV,
                reason: format!("`{raw}`: {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_path: get(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            secret_key: required(SECRET_KEY_ENV)?,
            admin_username: get(ADMIN_USERNAME_ENV),
            admin_password_hash: get(ADMIN_PASSWORD_HASH_ENV),
            frontend_urls,
            trusted_proxies,
            is_dev: get(IS_DEV_ENV).is_some_and(|v| v.eq_ignore_ascii_case("true")),
            recaptcha_secret: required(RECAPTCHA_SECRET_ENV)?,
            recaptcha_verify_url: get(RECAPTCHA_VERIFY_URL_ENV)
                .unwrap_or_else(|| recaptcha::DEFAULT_VERIFY_URL.to_string()),
            brevo_api_url: get(BREVO_API_URL_ENV)
                .unwrap_or_else(|| brevo::DEFAULT_API_URL.to_string()),
            mail: MailSettings {
                api_key: get(BREVO_API_KEY_ENV),
                sender: get(MAIL_FROM_ENV),
                recipient: get(MAIL_RECEIVER_ENV),
            },
            http_timeout,
            log_format,
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
