// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction repository.
//!
//! Each transaction is a JSON document under `transactions/`. The owner
//! reference is set at creation and there is no operation that changes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{DocumentStorage, StorageError, StorageResult};

/// A single monetary event owned by one user.
///
/// Positive amounts are income, negative amounts are expenses; zero is
/// permitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredTransaction {
    /// Unique transaction identifier (UUID)
    pub id: String,
    /// Owner user ID, immutable after creation
    pub owner_user_id: String,
    /// Short description
    pub title: String,
    /// Signed amount
    pub amount: f64,
    /// When the transaction happened
    pub date: DateTime<Utc>,
    /// Free-form category label
    pub category: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl super::super::OwnedResource for StoredTransaction {
    fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }

    fn resource_kind(&self) -> &'static str {
        "Transaction"
    }
}

/// Repository for transaction documents.
pub struct TransactionRepository<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new TransactionRepository.
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    /// Check if a transaction exists.
    pub fn exists(&self, tx_id: &str) -> bool {
        self.storage.exists(self.storage.paths().transaction(tx_id))
    }

    /// Get a transaction by ID.
    pub fn get(&self, tx_id: &str) -> StorageResult<StoredTransaction> {
        let path = self.storage.paths().transaction(tx_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound("Transaction".to_string()));
        }
        self.storage.read_json(path)
    }

    /// Create a new transaction.
    pub fn create(&self, tx: &StoredTransaction) -> StorageResult<()> {
        let tx_id = &tx.id;

        if self.exists(tx_id) {
            return Err(StorageError::AlreadyExists(format!("Transaction {tx_id}")));
        }

        self.storage
            .write_json(self.storage.paths().transaction(tx_id), tx)
    }

    /// Persist an updated transaction as a single atomic write.
    pub fn update(&self, tx: &StoredTransaction) -> StorageResult<()> {
        let tx_id = &tx.id;

        if !self.exists(tx_id) {
            return Err(StorageError::NotFound("Transaction".to_string()));
        }

        self.storage
            .write_json(self.storage.paths().transaction(tx_id), tx)
    }

    /// Delete a transaction. Immediate and unrecoverable.
    pub fn delete(&self, tx_id: &str) -> StorageResult<()> {
        if !self.exists(tx_id) {
            return Err(StorageError::NotFound("Transaction".to_string()));
        }

        self.storage.delete(self.storage.paths().transaction(tx_id))
    }

    /// List all transactions owned by a user, newest date first.
    ///
    /// Listing scopes the query by owner from the start; it is not a
    /// filter applied after loading someone else's data into a response.
    pub fn list_by_owner(&self, owner_user_id: &str) -> StorageResult<Vec<StoredTransaction>> {
        let tx_ids = self
            .storage
            .list_files(self.storage.paths().transactions_dir(), "json")?;

        let mut txs = Vec::new();
        for id in tx_ids {
            if let Ok(tx) = self.get(&id) {
                if tx.owner_user_id == owner_user_id {
                    txs.push(tx);
                }
            }
        }

        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(txs)
    }
}
