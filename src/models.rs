// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All public
//! types derive `ToSchema` for OpenAPI documentation.
//!
//! ## Validation
//!
//! Incoming JSON bodies are deserialized into loosely-typed input structs
//! (every field optional) and then converted into their validated form via
//! [`Validate`]. Missing fields and constraint violations are both reported
//! as per-field [`FieldError`]s, so a client gets one complete list of
//! problems in a single 422 response.
//!
//! ## Model Categories
//!
//! - **Contact**: Public contact-form submissions and stored records
//! - **Auth**: Admin login form and issued tokens

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FieldError;

/// Maximum length of the submitter's name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Maximum length of the submitter's email address, in characters.
pub const EMAIL_MAX_CHARS: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Conversion from raw request input into a validated value.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>>;
}

/// Basic email syntax check: one `@`, no whitespace, a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

// =============================================================================
// Contact Models
// =============================================================================

/// Contact form body as sent by the portfolio frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Jane Doe",
    "email": "jane@example.com",
    "message": "Hi, I liked your portfolio. Let's talk!"
}))]
pub struct ContactRequest {
    /// Submitter's name (1-100 characters).
    #[serde(default)]
    pub name: Option<String>,
    /// Submitter's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Message body (non-empty).
    #[serde(default)]
    pub message: Option<String>,
}

/// A contact form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Validate for ContactRequest {
    type Valid = ContactForm;

    fn validate(self) -> Result<ContactForm, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match self.name {
            None => {
                errors.push(FieldError::new("name", "field required"));
                None
            }
            Some(name) => {
                let chars = name.chars().count();
                if chars == 0 {
                    errors.push(FieldError::new("name", "must not be empty"));
                    None
                } else if chars > NAME_MAX_CHARS {
                    errors.push(FieldError::new(
                        "name",
                        format!("must be at most {NAME_MAX_CHARS} characters"),
                    ));
                    None
                } else {
                    Some(name)
                }
            }
        };

        let email = match self.email.map(|email| email.trim().to_string()) {
            None => {
                errors.push(FieldError::new("email", "field required"));
                None
            }
            Some(email) if email.chars().count() > EMAIL_MAX_CHARS => {
                errors.push(FieldError::new(
                    "email",
                    format!("must be at most {EMAIL_MAX_CHARS} characters"),
                ));
                None
            }
            Some(email) if !is_valid_email(&email) => {
                errors.push(FieldError::new("email", "value is not a valid email address"));
                None
            }
            Some(email) => Some(email),
        };

        let message = match self.message {
            None => {
                errors.push(FieldError::new("message", "field required"));
                None
            }
            Some(message) if message.is_empty() => {
                errors.push(FieldError::new("message", "must not be empty"));
                None
            }
            Some(message) => Some(message),
        };

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(ContactForm {
                name,
                email,
                message,
            }),
            _ => Err(errors),
        }
    }
}

/// A stored contact-form submission.
///
/// Rows are append-only: once inserted they are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Identifier assigned by the store.
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Insertion time (UTC), assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// Confirmation returned after a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub message: String,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Admin login form (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_request_passes() {
        let form = request("Jane", " jane@example.com ", "Hello").validate().unwrap();
        assert_eq!(form.name, "Jane");
        assert_eq!(form.email, "jane@example.com");
        assert_eq!(form.message, "Hello");
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = ContactRequest::default().validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["name", "email", "message"]);
    }

    #[test]
    fn name_length_is_bounded() {
        assert!(request("", "a@b.co", "hi").validate().is_err());
        assert!(request(&"x".repeat(100), "a@b.co", "hi").validate().is_ok());

        let errors = request(&"x".repeat(101), "a@b.co", "hi").validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["name"]);
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(request(&name, "a@b.co", "hi").validate().is_ok());
    }

    #[test]
    fn empty_message_is_rejected() {
        let errors = request("Jane", "a@b.co", "").validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["message"]);
    }

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL_PATTERN.is_match("a@b.co"));
    }

    #[test]
    fn email_syntax_is_checked() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe+tag@mail.example.org"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane doe@example.com"));

        let errors = request("Jane", "not-an-email", "hi").validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["email"]);
    }

    #[test]
    fn token_response_is_bearer() {
        let response = TokenResponse::bearer("abc".to_string());
        assert_eq!(response.token_type, "bearer");
    }
}
