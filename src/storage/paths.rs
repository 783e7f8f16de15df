// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

/// Default root directory for persistent documents.
/// Deployments override this via the `DATA_DIR` environment variable.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities for the on-disk document layout.
///
/// ```text
/// {root}/
///   users/{user_id}.json          # credential documents
///   users/by-email/{digest}.json  # email uniqueness index
///   transactions/{tx_id}.json     # transaction documents
///   audit/{date}/events.jsonl     # daily audit logs
/// ```
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user documents.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user document.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Directory containing the email uniqueness index.
    pub fn email_index_dir(&self) -> PathBuf {
        self.users_dir().join("by-email")
    }

    /// Path to an email index entry, keyed by digest of the normalized email.
    pub fn email_index(&self, email_digest: &str) -> PathBuf {
        self.email_index_dir().join(format!("{email_digest}.json"))
    }

    // ========== Transaction Paths ==========

    /// Directory containing all transaction documents.
    pub fn transactions_dir(&self) -> PathBuf {
        self.root.join("transactions")
    }

    /// Path to a specific transaction document.
    pub fn transaction(&self, tx_id: &str) -> PathBuf {
        self.transactions_dir().join(format!("{tx_id}.json"))
    }

    // ========== Audit Log Paths ==========

    /// Directory containing audit logs.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Directory for a specific date's audit logs.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// Path to a daily audit events file (JSONL format).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}
