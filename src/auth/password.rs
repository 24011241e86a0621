// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin credential checks using argon2 password hashes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a password using argon2id with a random salt (PHC string format).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// An unparsable hash is a failed verification, never a pass.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// The single admin account, as configured at startup.
#[derive(Clone, Default)]
pub struct AdminCredentials {
    username: Option<String>,
    password_hash: Option<String>,
}

impl AdminCredentials {
    pub fn new(username: Option<String>, password_hash: Option<String>) -> Self {
        Self {
            username,
            password_hash,
        }
    }

    /// Check a login attempt.
    ///
    /// Both the username and the password are always evaluated; the result
    /// is a plain boolean so callers cannot leak which one failed.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = self
            .username
            .as_deref()
            .is_some_and(|expected| expected == username);
        let password_ok = self
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));
        username_ok && password_ok
    }
}
