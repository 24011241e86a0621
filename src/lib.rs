// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portfolio Backend - admin login and public contact form service
//!
//! Accepts contact-form submissions from the portfolio frontend, checks them
//! against reCAPTCHA v3, stores them in an embedded redb database and
//! forwards them by email through Brevo. A single admin account can log in
//! for a bearer token and read the stored submissions.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Admin credentials and HS256 access tokens
//! - `providers` - reCAPTCHA and Brevo HTTP adapters
//! - `rate_limit` - Per-address limiter for the contact form
//! - `storage` - Contact submissions (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod rate_limit;
pub mod state;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod test_support;
