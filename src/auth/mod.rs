// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the Fintrack API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in and receives an HS256 token signed with
//!    the process-wide secret (`JWT_SECRET`), expiring after seven days.
//! 2. Client sends `Authorization: Bearer <token>` on every protected
//!    request.
//! 3. The `Auth` extractor:
//!    - verifies signature and expiry against the process secret
//!    - extracts `sub` → canonical user id
//!    - resolves the id against the credential store
//!    - attaches the resolved user (without the password hash) to the
//!      request
//!
//! ## Security
//!
//! - Tokens are stateless; there is no revocation before expiry
//! - The signing secret is loaded once at startup; a missing secret is
//!   fatal to the process, never a per-request error
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use token::{TokenKeys, TOKEN_TTL_SECS};
