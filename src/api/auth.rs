// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints.
//!
//! Both endpoints validate input before touching the store, and both
//! return an identity summary plus a freshly issued bearer token.
//!
//! Login answers the same 401 for an unknown email and for a wrong
//! password, so account existence is not guessable from the response.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    audit_log,
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
    state::AppState,
    storage::{normalize_email, AuditEventType, StorageError, StoredUser, UserRepository},
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Validate an email address shape: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.chars().any(char::is_whitespace)
                && !domain.chars().any(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// Hash a password for storage.
fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::internal("Server error")
    })
}

/// Register a new account.
///
/// Returns the identity summary and a bearer token so the client is logged
/// in immediately.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let name = request.name.as_deref().map(str::trim).unwrap_or_default();
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request(
            "Name, email and password are required",
        ));
    }

    if !is_valid_email(email) {
        return Err(ApiError::bad_request(
            "Please provide a valid email address",
        ));
    }

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters long",
        ));
    }

    let storage = state.storage();
    let repo = UserRepository::new(&storage);
    let email = normalize_email(email);

    // Pre-check is an optimization for a friendly fast path; the create
    // below is the real uniqueness guarantee.
    if repo.find_by_email(&email)?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let user = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        password_hash: hash_password(password)?,
        created_at: Utc::now(),
    };

    // A registration that slipped in between the pre-check and here loses
    // the index claim and maps to the same outcome as the pre-check.
    repo.create(&user).map_err(|e| match e {
        StorageError::AlreadyExists(_) => ApiError::bad_request("User already exists"),
        other => other.into(),
    })?;

    let token = state
        .token_keys()
        .issue(&user.id)
        .map_err(|_| ApiError::internal("Server error"))?;

    tracing::info!(user_id = %user.id, "user registered");
    audit_log!(&storage, AuditEventType::UserRegistered, user, "user", &user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    if !is_valid_email(email) {
        return Err(ApiError::bad_request(
            "Please provide a valid email address",
        ));
    }

    let storage = state.storage();
    let repo = UserRepository::new(&storage);

    // Unknown account and wrong password are indistinguishable to the
    // caller; do not specialize either branch.
    let Some(user) = repo.find_by_email(email)? else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if !user.verify_password(password) {
        tracing::debug!(user_id = %user.id, "login rejected: bad password");
        audit_log!(&storage, AuditEventType::AuthFailure, user, "user", &user.id);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state
        .token_keys()
        .issue(&user.id)
        .map_err(|_| ApiError::internal("Server error"))?;

    tracing::info!(user_id = %user.id, "user logged in");
    audit_log!(&storage, AuditEventType::UserLoggedIn, user, "user", &user.id);

    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}
