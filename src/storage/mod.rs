// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Contact Storage
//!
//! Persistent storage for contact-form submissions, backed by an embedded
//! redb database (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `contacts`: id (`u64`, ascending) → serialized `ContactSubmission` (JSON)
//!
//! ## Access Pattern
//!
//! Every operation opens its own redb transaction and either commits it or
//! drops it before returning, so no transaction outlives a single call.
//! The async wrappers run the blocking redb work on Tokio's blocking pool.

pub mod contacts;

pub use contacts::{ContactStore, StorageError, StorageResult};
