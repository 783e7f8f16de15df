// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! Verification order: bearer token extraction, signature + expiry check,
//! subject extraction, then resolution of the subject against the
//! credential store. Each rejection carries its own reason code; all of
//! them answer 401.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;
use crate::storage::{StorageError, UserRepository};

/// Extractor for authenticated users.
///
/// Validates the bearer token from the Authorization header and resolves
/// the embedded identity to a live account. Handlers that take `Auth`
/// cannot run without a verified user.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // An upstream layer may already have authenticated the request.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = bearer_token(parts)?;

        let claims = state.token_keys().verify(token).inspect_err(|e| {
            tracing::debug!(error_code = e.error_code(), "token verification rejected");
        })?;

        // A signed token without a subject is malformed, not a missing user.
        let user_id = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(AuthError::TokenInvalid)?;

        // The account may have disappeared since issuance.
        let storage = state.storage();
        let user = UserRepository::new(&storage)
            .get(&user_id)
            .map_err(|e| match e {
                StorageError::NotFound(_) => AuthError::UserNotFound,
                other => {
                    tracing::error!(error = %other, "credential store lookup failed");
                    AuthError::Internal
                }
            })?;

        Ok(Auth(user.into()))
    }
}

/// Extract the bearer token from the Authorization header.
///
/// Missing header, missing `Bearer ` prefix (case-insensitive), and an
/// empty token string all collapse to `NoToken`.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::NoToken)?
        .to_str()
        .map_err(|_| AuthError::NoToken)?;

    let token = auth_header
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("bearer "))
        .map(|_| auth_header[7..].trim())
        .ok_or(AuthError::NoToken)?;

    if token.is_empty() {
        return Err(AuthError::NoToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenKeys;
    use crate::storage::{normalize_email, DocumentStorage, StoragePaths, StoredUser};
    use axum::http::Request;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp.path());
        let mut storage = DocumentStorage::new(paths);
        storage.initialize().expect("Failed to initialize storage");

        let state = AppState::new(storage, TokenKeys::from_secret(b"test-secret"));
        (state, temp)
    }

    fn seed_user(state: &AppState, id: &str) -> StoredUser {
        let user = StoredUser {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: normalize_email("ada@example.com"),
            password_hash: bcrypt::hash("secret1", 4).unwrap(),
            created_at: Utc::now(),
        };
        let storage = state.storage();
        UserRepository::new(&storage).create(&user).unwrap();
        user
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(v) = value {
            builder = builder.header("Authorization", v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_no_token() {
        let (state, _temp) = create_test_state();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::NoToken)));
    }

    #[tokio::test]
    async fn missing_bearer_prefix_is_no_token() {
        let (state, _temp) = create_test_state();
        let mut parts = parts_with_header(Some("Token abc123"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::NoToken)));
    }

    #[tokio::test]
    async fn empty_token_after_prefix_is_no_token() {
        // "Bearer " with nothing behind it must be a clean rejection, not a
        // decode error surfaced to the client.
        let (state, _temp) = create_test_state();
        let mut parts = parts_with_header(Some("Bearer "));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::NoToken)));
    }

    #[tokio::test]
    async fn bearer_prefix_is_case_insensitive() {
        let (state, _temp) = create_test_state();
        seed_user(&state, "user_123");
        let token = state.token_keys().issue("user_123").unwrap();
        let mut parts = parts_with_header(Some(&format!("bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.id, "user_123");
    }

    #[tokio::test]
    async fn valid_token_resolves_identity_without_password() {
        let (state, _temp) = create_test_state();
        let seeded = seed_user(&state, "user_123");
        let token = state.token_keys().issue(&seeded.id).unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.id, seeded.id);
        assert_eq!(user.name, seeded.name);
        assert_eq!(user.email, seeded.email);
    }

    #[tokio::test]
    async fn token_for_deleted_account_is_user_not_found() {
        let (state, _temp) = create_test_state();
        let token = state.token_keys().issue("ghost").unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_as_expired() {
        let (state, _temp) = create_test_state();
        seed_user(&state, "user_123");
        let token = state
            .token_keys()
            .issue_with_lifetime("user_123", -120)
            .unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected_as_invalid() {
        let (state, _temp) = create_test_state();
        seed_user(&state, "user_123");
        let token = state.token_keys().issue("user_123").unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}x")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _temp) = create_test_state();
        let mut parts = parts_with_header(None);

        let user = AuthenticatedUser {
            id: "user_from_middleware".to_string(),
            name: "Mid".to_string(),
            email: "mid@example.com".to_string(),
        };
        parts.extensions.insert(user.clone());

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.id, "user_from_middleware");
    }
}
