// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredUser;

/// Claims carried by a bearer token.
///
/// The token is self-contained: it embeds the user id and an expiry seven
/// days after issuance, and nothing else. There is no server-side session
/// behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id the token acts as.
    ///
    /// Optional at the wire level so a signed-but-subjectless token is
    /// classified as invalid rather than failing deserialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authenticated user attached to a request after token verification.
///
/// Resolved from the credential store on every authenticated request; the
/// password hash is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email (normalized)
    pub email: String,
}

impl From<StoredUser> for AuthenticatedUser {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
