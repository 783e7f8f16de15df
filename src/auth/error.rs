// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The five rejection reason codes are distinct for operator diagnostics;
//! all of them answer 401. They deliberately do not reveal more than the
//! documented code: `UserNotFound` (token subject no longer
//! exists) and `TokenInvalid` (bad signature) differ only in code, not in
//! status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// No usable bearer token: header absent, prefix absent, or empty token
    NoToken,
    /// Token is malformed, its signature is invalid, or it has no subject
    TokenInvalid,
    /// Token has expired
    TokenExpired,
    /// Verification failed for a reason outside the classified cases
    AuthenticationFailed,
    /// Token verified but its subject no longer resolves to an account
    UserNotFound,
    /// Credential store failure during resolution (not an auth outcome)
    Internal,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoToken => "no_token",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::AuthenticationFailed => "auth_failed",
            AuthError::UserNotFound => "user_not_found",
            AuthError::Internal => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoToken
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::AuthenticationFailed
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NoToken => write!(f, "No token provided"),
            AuthError::TokenInvalid => write!(f, "Not authorized, token invalid"),
            AuthError::TokenExpired => write!(f, "Not authorized, token expired"),
            AuthError::AuthenticationFailed => write!(f, "Authentication failed"),
            AuthError::UserNotFound => write!(f, "Not authorized, user not found"),
            AuthError::Internal => write!(f, "Server error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn no_token_returns_401() {
        let response = AuthError::NoToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "no_token");
        assert_eq!(body["error"], "No token provided");
    }

    #[test]
    fn all_rejection_codes_are_unauthorized() {
        for err in [
            AuthError::NoToken,
            AuthError::TokenInvalid,
            AuthError::TokenExpired,
            AuthError::AuthenticationFailed,
            AuthError::UserNotFound,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn internal_is_500() {
        assert_eq!(
            AuthError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn expired_and_invalid_have_distinct_codes() {
        assert_ne!(
            AuthError::TokenExpired.error_code(),
            AuthError::TokenInvalid.error_code()
        );
    }
}
