// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Adapters for external HTTP services.
//!
//! Each adapter parses provider responses into explicit types at the
//! boundary; loosely-typed JSON never leaves this module.

pub mod brevo;
pub mod recaptcha;

use std::time::Duration;

use reqwest::Client;

pub use brevo::{BrevoMailer, MailError, MailSettings, OutgoingEmail};
pub use recaptcha::{RecaptchaVerifier, RejectReason, Verdict};

/// Shared outbound HTTP client with a bounded request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}
