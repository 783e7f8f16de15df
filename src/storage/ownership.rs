// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for stored resources.
//!
//! Every operation on an existing transaction passes through these checks.
//! Owner identifiers are compared as opaque strings; this module is the
//! single comparison point for read, update, and delete, so the
//! representation cannot drift between operations.
//!
//! The `Option` impl of [`OwnershipCheck`] encodes the guard ordering:
//! a missing resource is `NotFound` before any ownership comparison runs,
//! so a probe with an unknown id never learns whether the id exists for
//! someone else.

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;

    /// Resource kind used in error messages ("Transaction", ...).
    fn resource_kind(&self) -> &'static str;
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StorageError::PermissionDenied` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if self.owner_user_id() == user.id {
            Ok(())
        } else {
            Err(StorageError::PermissionDenied {
                user_id: user.id.clone(),
                resource: self.resource_kind().to_string(),
            })
        }
    }
}

/// Extension trait combining the existence and ownership checks.
pub trait OwnershipCheck<T> {
    /// Verify ownership and return the resource if authorized.
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for StorageResult<T> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T> {
        let resource = self?;
        resource.verify_ownership(user)?;
        Ok(resource)
    }
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T> {
        match self {
            Some(resource) => {
                resource.verify_ownership(user)?;
                Ok(resource)
            }
            // Existence is checked first: absent resources are NotFound for
            // every caller, owner or not.
            None => Err(StorageError::NotFound("Resource".to_string())),
        }
    }
}
