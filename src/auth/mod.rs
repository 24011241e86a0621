// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Single-admin authentication for the portfolio backend.
//!
//! ## Auth Flow
//!
//! 1. Admin posts `username` / `password` to `POST /login`
//! 2. Server:
//!    - Compares the username with `ADMIN_USERNAME`
//!    - Verifies the password against the argon2 hash in `ADMIN_PASSWORD_HASH`
//!    - Issues an HS256 access token (`sub` = username, 60 minute expiry)
//! 3. Admin sends `Authorization: Bearer <token>` to protected endpoints
//! 4. The [`Auth`] extractor verifies signature and expiry
//!
//! ## Security
//!
//! - Login failures never reveal which check failed
//! - Token failures (bad signature, expired, malformed) share one response
//! - A missing password hash fails closed
//! - No clock skew leeway: a token is expired from its `exp` second onwards

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::Claims;
pub use error::AuthError;
pub use extractor::Auth;
pub use password::AdminCredentials;
pub use token::{TokenService, DEFAULT_TOKEN_TTL, LOGIN_TOKEN_TTL};
