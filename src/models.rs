// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Transaction responses reuse [`crate::storage::StoredTransaction`]
//! directly: the stored document contains nothing the owner may not see.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Auth Models
// =============================================================================

/// Request to register a new account.
///
/// Fields are optional at the wire level so that missing input surfaces as
/// this API's own validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name.
    pub name: Option<String>,
    /// Login email; must look like `local@domain.tld`.
    pub email: Option<String>,
    /// Password, at least 6 characters.
    pub password: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// Response to a successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// The account's unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Normalized login email.
    pub email: String,
    /// Bearer token, valid for seven days.
    pub token: String,
}

// =============================================================================
// Transaction Models
// =============================================================================

/// Request to create a transaction.
///
/// All fields are required; `amount` counts as present when the field
/// exists, so an explicit `0` is valid.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Short description.
    pub title: Option<String>,
    /// Signed amount: positive income, negative expense, zero permitted.
    pub amount: Option<f64>,
    /// Calendar timestamp, RFC 3339 or `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Free-form category label.
    pub category: Option<String>,
}

/// Request to partially update a transaction.
///
/// Omitted fields leave the stored values untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTransactionRequest {
    /// New title, if changing.
    pub title: Option<String>,
    /// New amount, if changing.
    pub amount: Option<f64>,
    /// New date, if changing.
    pub date: Option<String>,
    /// New category, if changing.
    pub category: Option<String>,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}
