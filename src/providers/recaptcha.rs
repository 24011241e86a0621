// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Google reCAPTCHA v3 verification.
//!
//! The verifier posts the client token together with the server secret to
//! the `siteverify` endpoint and turns the answer into a [`Verdict`]. Every
//! failure mode (transport error, unexpected status, unparsable body,
//! missing score) is a rejection: the check fails closed.

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Minimum score for a submission to count as human.
pub const MIN_SCORE: f64 = 0.5;

/// Body returned by `siteverify`.
#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Outcome of a humanity check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Human { score: f64 },
    Rejected { reason: RejectReason },
}

impl Verdict {
    pub fn is_human(&self) -> bool {
        matches!(self, Verdict::Human { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Provider answered `success: false`.
    Unsuccessful { error_codes: Vec<String> },
    /// Score below [`MIN_SCORE`].
    LowScore { score: f64 },
    /// `success: true` without a score.
    MissingScore,
    /// Request failed or the provider answered with a non-2xx status.
    Transport(String),
    /// Body did not match the expected schema.
    InvalidResponse(String),
}

#[derive(Clone)]
pub struct RecaptchaVerifier {
    http: Client,
    verify_url: String,
    secret: String,
    min_score: f64,
}

impl RecaptchaVerifier {
    pub fn new(http: Client, verify_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            http,
            verify_url: verify_url.into(),
            secret: secret.into(),
            min_score: MIN_SCORE,
        }
    }

    /// Verify a client-supplied token. Never errors; failures are rejections.
    pub async fn verify(&self, token: &str) -> Verdict {
        let form = [("secret", self.secret.as_str()), ("response", token)];

        let response = match self.http.post(&self.verify_url).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "reCAPTCHA request failed");
                return rejected(RejectReason::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "reCAPTCHA endpoint returned an error status");
            return rejected(RejectReason::Transport(format!("HTTP {status}")));
        }

        let body = match response.json::<SiteVerifyResponse>().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "reCAPTCHA response did not match the expected schema");
                return rejected(RejectReason::InvalidResponse(e.to_string()));
            }
        };

        info!(
            success = body.success,
            score = ?body.score,
            action = ?body.action,
            error_codes = ?body.error_codes,
            "reCAPTCHA verify response"
        );

        evaluate(body, self.min_score)
    }
}

fn rejected(reason: RejectReason) -> Verdict {
    Verdict::Rejected { reason }
}

fn evaluate(body: SiteVerifyResponse, min_score: f64) -> Verdict {
    if !body.success {
        return rejected(RejectReason::Unsuccessful {
            error_codes: body.error_codes,
        });
    }
    match body.score {
        None => rejected(RejectReason::MissingScore),
        Some(score) if score >= min_score => Verdict::Human { score },
        Some(score) => rejected(RejectReason::LowScore { score }),
    }
}
