// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AuthResponse, CreateTransactionRequest, LoginRequest, MessageResponse, RegisterRequest,
        UpdateTransactionRequest,
    },
    state::AppState,
    storage::StoredTransaction,
};

pub mod auth;
pub mod health;
pub mod transactions;

/// Build the application router.
///
/// `allowed_origins` is the explicit CORS allowlist; an empty list falls
/// back to a permissive policy (non-browser clients are unaffected either
/// way).
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer from the configured allowlist.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::create_transaction,
        transactions::update_transaction,
        transactions::delete_transaction,
        health::health,
        health::ready
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            MessageResponse,
            StoredTransaction
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Transactions", description = "Per-user transaction management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenKeys;
    use crate::storage::{DocumentStorage, StoragePaths};
    use tempfile::TempDir;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let temp = TempDir::new().unwrap();
        let mut storage = DocumentStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let state = AppState::new(storage, TokenKeys::from_secret(b"test-secret"));

        let app = router(state, &[]);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn router_builds_with_origin_allowlist() {
        let temp = TempDir::new().unwrap();
        let mut storage = DocumentStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let state = AppState::new(storage, TokenKeys::from_secret(b"test-secret"));

        let app = router(
            state,
            &[
                "http://localhost:5173".to_string(),
                "https://app.example.com".to_string(),
            ],
        );
        let _ = app.into_make_service();
    }
}
