// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::{error, info, warn};

use crate::{
    api::extract::{ClientIp, RecaptchaToken, ValidJson},
    error::{ApiError, ErrorBody},
    models::{ContactRequest, ContactResponse},
    providers::{MailError, OutgoingEmail, Verdict},
    rate_limit::RateLimitDecision,
    state::AppState,
};

pub const CONTACT_THANKS: &str = "Gracias por contactarme, te responderé de inmediato.";
pub const RATE_LIMITED: &str = "Demasiadas solicitudes. Por favor, reduce la velocidad.";
pub const CAPTCHA_FAILED: &str = "reCAPTCHA verification failed.";
pub const MAIL_NOT_CONFIGURED: &str = "Email configuration incomplete.";
pub const MAIL_FAILED: &str = "No se pudo enviar el correo.";

/// Accept a contact-form submission.
///
/// Order of checks: rate limit, reCAPTCHA, store, notify. A submission that
/// was stored stays stored even when the notification email fails.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    params(
        ("recaptcha-token" = String, Header, description = "reCAPTCHA v3 token from the frontend")
    ),
    tag = "Contact",
    responses(
        (status = 200, description = "Submission stored and forwarded", body = ContactResponse),
        (status = 400, description = "reCAPTCHA verification failed", body = ErrorBody),
        (status = 422, description = "Invalid body or missing token header", body = ErrorBody),
        (status = 429, description = "Too many submissions from this address", body = ErrorBody),
        (status = 500, description = "Storage or email failure", body = ErrorBody)
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    RecaptchaToken(token): RecaptchaToken,
    ValidJson(form): ValidJson<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    if state.rate_limiter.check(client_ip) == RateLimitDecision::Limited {
        warn!(client = %client_ip, "contact rate limit exceeded");
        return Err(ApiError::too_many_requests(RATE_LIMITED));
    }

    if let Verdict::Rejected { reason } = state.recaptcha.verify(&token).await {
        info!(client = %client_ip, ?reason, "contact submission failed reCAPTCHA");
        return Err(ApiError::bad_request(CAPTCHA_FAILED));
    }

    let contact = state.contacts.create(form).await?;
    info!(id = contact.id, client = %client_ip, "contact submission stored");

    state
        .mailer
        .send(&OutgoingEmail::contact_notification(&contact))
        .await
        .map_err(|e| match e {
            MailError::NotConfigured => ApiError::internal(MAIL_NOT_CONFIGURED),
            other => {
                error!(id = contact.id, error = %other, "contact notification failed");
                ApiError::internal(MAIL_FAILED)
            }
        })?;

    Ok(Json(ContactResponse {
        message: CONTACT_THANKS.to_string(),
    }))
}
