// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Brevo transactional email relay.
//!
//! Sends plaintext notifications through `POST /v3/smtp/email`. The sender
//! and the recipient are fixed by configuration; an incomplete
//! configuration is reported before any network call is attempted.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::ContactSubmission;

pub const DEFAULT_API_URL: &str = "https://api.brevo.com";

const SEND_EMAIL_PATH: &str = "/v3/smtp/email";

/// Subject line of contact notifications.
pub const CONTACT_SUBJECT: &str = "New message from my portfolio";

/// Relay credentials and addresses. All three are needed to send.
#[derive(Clone, Default)]
pub struct MailSettings {
    pub api_key: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl MailSettings {
    pub fn is_complete(&self) -> bool {
        self.api_key.is_some() && self.sender.is_some() && self.recipient.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email configuration incomplete")]
    NotConfigured,

    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected the message with HTTP {status}")]
    Rejected { status: u16 },
}

/// A plaintext message to the configured recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub text: String,
}

impl OutgoingEmail {
    /// Notification for a freshly stored contact submission.
    pub fn contact_notification(contact: &ContactSubmission) -> Self {
        Self {
            subject: CONTACT_SUBJECT.to_string(),
            text: format!(
                "Name: {}\nEmail: {}\nMessage:\n{}",
                contact.name, contact.email, contact.message
            ),
        }
    }
}

#[derive(Serialize)]
struct Mailbox<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailPayload<'a> {
    sender: Mailbox<'a>,
    to: [Mailbox<'a>; 1],
    subject: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    #[serde(default)]
    message_id: Option<String>,
}

#[derive(Clone)]
pub struct BrevoMailer {
    http: Client,
    api_url: String,
    settings: MailSettings,
}

impl BrevoMailer {
    pub fn new(http: Client, api_url: impl Into<String>, settings: MailSettings) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            settings,
        }
    }

    /// Deliver `email`. Any non-2xx answer is a failure.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let (Some(api_key), Some(sender), Some(recipient)) = (
            self.settings.api_key.as_deref(),
            self.settings.sender.as_deref(),
            self.settings.recipient.as_deref(),
        ) else {
            warn!("email relay is not configured; refusing to send");
            return Err(MailError::NotConfigured);
        };

        let payload = SendEmailPayload {
            sender: Mailbox { email: sender },
            to: [Mailbox { email: recipient }],
            subject: &email.subject,
            text_content: &email.text,
        };

        let response = self
            .http
            .post(format!(
                "{}{SEND_EMAIL_PATH}",
                self.api_url.trim_end_matches('/')
            ))
            .header("accept", "application/json")
            .header("api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Brevo request failed");
                MailError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Brevo rejected the message");
            return Err(MailError::Rejected {
                status: status.as_u16(),
            });
        }

        let message_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id);
        info!(status = status.as_u16(), message_id = ?message_id, "Brevo accepted the message");
        Ok(())
    }
}
