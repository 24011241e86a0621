// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Append-only contact submission table.

use std::{path::Path, sync::Arc};

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};

use crate::models::{ContactForm, ContactSubmission};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized ContactSubmission (JSON bytes).
const CONTACTS: TableDefinition<u64, &[u8]> = TableDefinition::new("contacts");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("blocking storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// ContactStore
// =============================================================================

/// Handle to the contact database. Cheap to clone.
#[derive(Clone)]
pub struct ContactStore {
    db: Arc<Database>,
}

impl ContactStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CONTACTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert a new submission, assigning its id and timestamp.
    ///
    /// The id is one past the current highest id, computed inside the same
    /// write transaction as the insert. redb serializes write transactions,
    /// so concurrent inserts never share an id.
    pub fn insert(&self, form: ContactForm) -> StorageResult<ContactSubmission> {
        let write_txn = self.db.begin_write()?;
        let contact = {
            let mut table = write_txn.open_table(CONTACTS)?;
            let id = match table.last()? {
                Some((key, _)) => key.value() + 1,
                None => 1,
            };

            let contact = ContactSubmission {
                id,
                name: form.name,
                email: form.email,
                message: form.message,
                created_at: Utc::now(),
            };
            let json = serde_json::to_vec(&contact)?;
            table.insert(id, json.as_slice())?;
            contact
        };
        write_txn.commit()?;
        Ok(contact)
    }

    /// Look up a single submission by id.
    pub fn get(&self, id: u64) -> StorageResult<Option<ContactSubmission>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTACTS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Most recent submissions first, at most `limit` of them.
    pub fn list_recent(&self, limit: usize) -> StorageResult<Vec<ContactSubmission>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTACTS)?;

        let mut contacts = Vec::with_capacity(limit.min(64));
        for entry in table.iter()?.rev().take(limit) {
            let (_, value) = entry?;
            contacts.push(serde_json::from_slice(value.value())?);
        }
        Ok(contacts)
    }

    /// Number of stored submissions.
    pub fn count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTACTS)?;
        Ok(table.len()?)
    }

    // =========================================================================
    // Async wrappers
    // =========================================================================

    pub async fn create(&self, form: ContactForm) -> StorageResult<ContactSubmission> {
        self.run_blocking(move |store| store.insert(form)).await
    }

    pub async fn fetch(&self, id: u64) -> StorageResult<Option<ContactSubmission>> {
        self.run_blocking(move |store| store.get(id)).await
    }

    pub async fn recent(&self, limit: usize) -> StorageResult<Vec<ContactSubmission>> {
        self.run_blocking(move |store| store.list_recent(limit)).await
    }

    pub async fn stored_count(&self) -> StorageResult<u64> {
        self.run_blocking(|store| store.count()).await
    }

    async fn run_blocking<T, F>(&self, op: F) -> StorageResult<T>
    where
        F: FnOnce(&ContactStore) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store)).await?
    }
}

// =============================================================================
// Tests
// =============================================================================
