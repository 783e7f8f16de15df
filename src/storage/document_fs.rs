// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem-backed JSON document store.
//!
//! Each entity is a single JSON document in its own file. Writes go to a
//! temp file and are renamed into place, so a document is either fully
//! updated or untouched; readers never observe a partial write.
//!
//! Uniqueness constraints (the email index) rely on `create_json`, which
//! uses `O_CREAT|O_EXCL` semantics: of two racing creators exactly one
//! succeeds, the other gets `StorageError::AlreadyExists`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("{0} not found")]
    NotFound(String),
    /// Entity already exists
    #[error("{0} already exists")]
    AlreadyExists(String),
    /// Storage not initialized
    #[error("storage not initialized")]
    NotInitialized,
    /// Ownership check failed
    #[error("permission denied: user {user_id} cannot access {resource}")]
    PermissionDenied { user_id: String, resource: String },
    /// Generic serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Document store over a directory tree of JSON files.
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl DocumentStorage {
    /// Create a new DocumentStorage instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Initialize the document store directory structure.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [
            self.paths.users_dir(),
            self.paths.email_index_dir(),
            self.paths.transactions_dir(),
            self.paths.audit_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Check that the store is writable and round-trips data.
    ///
    /// Performs a write-read-delete cycle under the storage root.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let test_file = self.paths.root().join(".health_check");
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::SerializationError(
                "Health check data mismatch".to_string(),
            ));
        }

        Ok(())
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON document and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON document (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Create a JSON document, failing if the path already exists.
    ///
    /// This is the store-level uniqueness primitive: creation uses
    /// `create_new`, so concurrent creators race on the filesystem and
    /// exactly one wins.
    ///
    /// # Errors
    /// Returns `StorageError::AlreadyExists` if a document is already
    /// present at `path`.
    pub fn create_json<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(path.display().to_string())
                } else {
                    StorageError::Io(e)
                }
            })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    /// Check if a document exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a document.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List document ids (file stems) in a directory with the given extension.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == extension {
                        if let Some(stem) = path.file_stem() {
                            if let Some(id) = stem.to_str() {
                                ids.push(id.to_string());
                            }
                        }
                    }
                }
            }
        }
        Ok(ids)
    }

    // ========== Raw File Operations (audit JSONL) ==========

    /// Write raw bytes to a file.
    pub fn write_raw(&self, path: impl AsRef<Path>, data: &[u8]) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    /// Read raw bytes from a file.
    pub fn read_raw(&self, path: impl AsRef<Path>) -> StorageResult<Vec<u8>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let mut file = File::open(path.as_ref())?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}
