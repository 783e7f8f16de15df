// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for security-sensitive operations.
//!
//! Registrations, logins, authentication failures, and transaction
//! mutations are appended to daily JSONL files under `audit/`. Logging is
//! best-effort: a failed append never fails the request that triggered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DocumentStorage, StorageResult};

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Account events
    UserRegistered,
    UserLoggedIn,

    // Auth events
    AuthFailure,
    PermissionDenied,

    // Transaction events
    TransactionCreated,
    TransactionUpdated,
    TransactionDeleted,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// User who triggered the event (if known).
    pub user_id: Option<String>,
    /// Resource affected (transaction id, user id).
    pub resource_id: Option<String>,
    /// Resource type ("transaction", "user").
    pub resource_type: Option<String>,
    /// Additional details as JSON.
    pub details: Option<serde_json::Value>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if operation failed.
    pub error: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            user_id: None,
            resource_id: None,
            resource_type: None,
            details: None,
            success: true,
            error: None,
        }
    }

    /// Set the user ID.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the resource.
    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Add details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failed with error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }
}

/// Repository for audit events.
pub struct AuditRepository<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    /// Log an audit event.
    ///
    /// Events are appended to a daily log file in JSONL format.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let path = self.storage.paths().audit_events_file(&date);

        let mut content = self.storage.read_raw(&path).unwrap_or_default();

        let event_json = serde_json::to_string(event).map_err(|e| {
            super::StorageError::SerializationError(format!(
                "Failed to serialize audit event: {}",
                e
            ))
        })?;

        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(event_json.as_bytes());
        content.push(b'\n');

        self.storage.write_raw(&path, &content)
    }

    /// Read audit events for a specific date.
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let path = self.storage.paths().audit_events_file(date);
        let content = self.storage.read_raw(&path)?;

        let content_str = String::from_utf8(content).map_err(|e| {
            super::StorageError::SerializationError(format!("Invalid UTF-8 in audit log: {}", e))
        })?;

        let mut events = Vec::new();
        for line in content_str.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let event: AuditEvent = serde_json::from_str(line).map_err(|e| {
                super::StorageError::SerializationError(format!(
                    "Failed to deserialize audit event: {}",
                    e
                ))
            })?;
            events.push(event);
        }

        Ok(events)
    }
}

/// Helper macro for logging audit events without failing the caller.
#[macro_export]
macro_rules! audit_log {
    ($storage:expr, $event_type:expr, $user:expr) => {{
        let repo = $crate::storage::AuditRepository::new($storage);
        let event = $crate::storage::AuditEvent::new($event_type).with_user(&$user.id);
        if let Err(e) = repo.log(&event) {
            tracing::warn!(error = %e, "failed to write audit event");
        }
    }};
    ($storage:expr, $event_type:expr, $user:expr, $resource_type:expr, $resource_id:expr) => {{
        let repo = $crate::storage::AuditRepository::new($storage);
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user(&$user.id)
            .with_resource($resource_type, $resource_id);
        if let Err(e) = repo.log(&event) {
            tracing::warn!(error = %e, "failed to write audit event");
        }
    }};
}
