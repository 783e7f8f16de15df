// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the DocumentStorage for all file operations.

pub mod transactions;
pub mod users;

pub use transactions::{StoredTransaction, TransactionRepository};
pub use users::{normalize_email, StoredUser, UserRepository};
