// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Print an argon2 hash for `ADMIN_PASSWORD_HASH`.
//!
//! Reads the password from the first line of stdin:
//!
//! ```text
//! printf '%s' 'my password' | cargo run --bin hash-password
//! ```

use std::io::{self, BufRead};

use portfolio_backend::auth::password::hash_password;

fn main() {
    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        eprintln!("failed to read password from stdin: {e}");
        std::process::exit(1);
    }

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        eprintln!("refusing to hash an empty password");
        std::process::exit(1);
    }

    match hash_password(password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("failed to hash password: {e}");
            std::process::exit(1);
        }
    }
}
