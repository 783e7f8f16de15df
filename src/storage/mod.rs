// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Store Module
//!
//! Persistent storage as a tree of JSON documents on the local filesystem,
//! rooted at `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   users/
//!     {user_id}.json        # Credential documents (incl. password hash)
//!     by-email/
//!       {digest}.json       # Email uniqueness index
//!   transactions/
//!     {tx_id}.json          # Transaction documents
//!   audit/
//!     {date}/events.jsonl   # Daily audit logs
//! ```
//!
//! ## Consistency Model
//!
//! - Documents are written atomically (temp file + rename); a reader sees
//!   either the old or the new document, never a partial one.
//! - Email uniqueness is claimed with create-new semantics, so a racing
//!   duplicate registration fails at the store even when both pre-checks
//!   passed.
//! - No cross-document transactions exist; no operation needs one.

pub mod audit;
pub mod document_fs;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use document_fs::{DocumentStorage, StorageError, StorageResult};
pub use ownership::{OwnedResource, OwnershipCheck, OwnershipEnforcer};
pub use paths::StoragePaths;
pub use repository::{
    normalize_email, StoredTransaction, StoredUser, TransactionRepository, UserRepository,
};
