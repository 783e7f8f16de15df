// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository: the credential store.
//!
//! Each user is a JSON document under `users/`. Email uniqueness is
//! enforced by an index entry under `users/by-email/`, keyed by a digest of
//! the normalized address so arbitrary emails map to safe file names. The
//! index entry is claimed with create-new semantics, which makes it the
//! store-level uniqueness guarantee: a pre-check in the handler is only an
//! optimization, and a lost race surfaces as `AlreadyExists` all the same.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

use super::super::{DocumentStorage, StorageError, StorageResult};

/// User credential document.
///
/// The password hash never leaves the storage layer; API responses are
/// built from the other fields only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, normalized (trimmed, NFC, lowercased)
    pub email: String,
    /// bcrypt password verifier
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Check a candidate password against the stored verifier.
    ///
    /// Pass/fail only; a corrupt or foreign-format hash counts as a failed
    /// verification rather than an error.
    pub fn verify_password(&self, candidate: &str) -> bool {
        bcrypt::verify(candidate, &self.password_hash).unwrap_or(false)
    }
}

/// Email index entry pointing at the owning user document.
#[derive(Debug, Serialize, Deserialize)]
struct EmailIndexEntry {
    user_id: String,
}

/// Normalize an email for storage and lookup: trim, NFC, lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfc().collect::<String>().to_lowercase()
}

/// Digest of a normalized email, used as the index file name.
fn email_digest(normalized_email: &str) -> String {
    let digest = Sha256::digest(normalized_email.as_bytes());
    Base64UrlUnpadded::encode_string(&digest)
}

/// Repository for user documents.
pub struct UserRepository<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Look up a user by email. The address is normalized before lookup.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let digest = email_digest(&normalize_email(email));
        let index_path = self.storage.paths().email_index(&digest);
        if !self.storage.exists(&index_path) {
            return Ok(None);
        }

        let entry: EmailIndexEntry = self.storage.read_json(index_path)?;
        match self.get(&entry.user_id) {
            Ok(user) => Ok(Some(user)),
            // Dangling index entry; treat as absent.
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new user. The user's email must already be normalized.
    ///
    /// # Errors
    /// Returns `StorageError::AlreadyExists` when the email is taken,
    /// whether detected here or by a concurrent registration that claimed
    /// the index entry first.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let digest = email_digest(&user.email);
        let index_path = self.storage.paths().email_index(&digest);

        let entry = EmailIndexEntry {
            user_id: user.id.clone(),
        };
        self.storage
            .create_json(&index_path, &entry)
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    StorageError::AlreadyExists(format!("User {}", user.email))
                }
                other => other,
            })?;

        // Release the claim if the user document cannot be written, so a
        // failed registration does not squat the address.
        if let Err(e) = self.storage.write_json(self.storage.paths().user(&user.id), user) {
            let _ = self.storage.delete(&index_path);
            return Err(e);
        }

        Ok(())
    }
}
