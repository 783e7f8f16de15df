// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints.
//!
//! Listing and creation operate only on the caller's own data. The
//! single-resource operations (get, update, delete) apply the ownership
//! guard in a fixed order: existence first (absent → 404 for every
//! caller), then ownership (foreign → 403). A probe with an unknown id
//! can never distinguish "not mine" from "does not exist".

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    audit_log,
    auth::{Auth, AuthenticatedUser},
    error::ApiError,
    models::{CreateTransactionRequest, MessageResponse, UpdateTransactionRequest},
    state::AppState,
    storage::{
        AuditEventType, DocumentStorage, OwnershipEnforcer, StoredTransaction,
        TransactionRepository,
    },
};

/// Enforce ownership of a loaded transaction, auditing denials.
///
/// Callers load the resource first, so a missing id has already answered
/// 404 by the time this runs.
fn guard_owner(
    storage: &DocumentStorage,
    tx: &StoredTransaction,
    user: &AuthenticatedUser,
) -> Result<(), ApiError> {
    if let Err(e) = tx.verify_ownership(user) {
        audit_log!(storage, AuditEventType::PermissionDenied, user, "transaction", &tx.id);
        return Err(e.into());
    }
    Ok(())
}

/// Parse a transaction date: RFC 3339, or a bare `YYYY-MM-DD` taken as
/// midnight UTC.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(ApiError::bad_request("Invalid date"))
}

/// List the caller's transactions, newest date first.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Transactions owned by the caller", body = [StoredTransaction]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredTransaction>>, ApiError> {
    let storage = state.storage();
    let repo = TransactionRepository::new(&storage);
    let txs = repo.list_by_owner(&user.id)?;
    Ok(Json(txs))
}

/// Get a single transaction.
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(
        ("id" = String, Path, description = "Transaction ID")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The transaction", body = StoredTransaction),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the owner"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let storage = state.storage();
    let repo = TransactionRepository::new(&storage);

    // Existence before ownership: a missing id is 404 for everyone.
    let tx = repo.get(&tx_id)?;
    guard_owner(&storage, &tx, &user)?;

    Ok(Json(tx))
}

/// Create a transaction owned by the caller.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = CreateTransactionRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Transaction created", body = StoredTransaction),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<StoredTransaction>), ApiError> {
    let title = request.title.as_deref().map(str::trim).unwrap_or_default();
    let category = request
        .category
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    // An amount of 0 is a present field; only absence fails the check.
    if title.is_empty() || request.amount.is_none() || request.date.is_none() || category.is_empty()
    {
        return Err(ApiError::bad_request("Please fill all fields"));
    }

    let date = parse_date(request.date.as_deref().unwrap_or_default())?;

    let now = Utc::now();
    let tx = StoredTransaction {
        id: uuid::Uuid::new_v4().to_string(),
        // Owner comes from the verified requester, never from the body.
        owner_user_id: user.id.clone(),
        title: title.to_string(),
        amount: request.amount.unwrap_or_default(),
        date,
        category: category.to_string(),
        created_at: now,
        updated_at: now,
    };

    let storage = state.storage();
    let repo = TransactionRepository::new(&storage);
    repo.create(&tx)?;

    audit_log!(&storage, AuditEventType::TransactionCreated, user, "transaction", &tx.id);

    Ok((StatusCode::CREATED, Json(tx)))
}

/// Partially update a transaction.
///
/// Omitted fields keep their stored values; provided fields are validated
/// as on create. The updated document is persisted as one atomic write.
#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(
        ("id" = String, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated transaction", body = StoredTransaction),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the owner"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn update_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let storage = state.storage();
    let repo = TransactionRepository::new(&storage);

    let mut tx = repo.get(&tx_id)?;
    guard_owner(&storage, &tx, &user)?;

    if let Some(title) = request.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::bad_request("Title cannot be empty"));
        }
        tx.title = title;
    }
    if let Some(amount) = request.amount {
        tx.amount = amount;
    }
    if let Some(date) = request.date {
        tx.date = parse_date(&date)?;
    }
    if let Some(category) = request.category {
        let category = category.trim().to_string();
        if category.is_empty() {
            return Err(ApiError::bad_request("Category cannot be empty"));
        }
        tx.category = category;
    }

    tx.updated_at = Utc::now();
    repo.update(&tx)?;

    audit_log!(&storage, AuditEventType::TransactionUpdated, user, "transaction", &tx.id);

    Ok(Json(tx))
}

/// Delete a transaction. Immediate and unrecoverable.
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(
        ("id" = String, Path, description = "Transaction ID")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the owner"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn delete_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let storage = state.storage();
    let repo = TransactionRepository::new(&storage);

    let tx = repo.get(&tx_id)?;
    guard_owner(&storage, &tx, &user)?;

    repo.delete(&tx_id)?;

    audit_log!(&storage, AuditEventType::TransactionDeleted, user, "transaction", &tx_id);

    Ok(Json(MessageResponse {
        message: "Transaction deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, TokenKeys};
    use crate::storage::{DocumentStorage, StoragePaths};
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().unwrap();
        let paths = StoragePaths::new(temp.path());
        let mut storage = DocumentStorage::new(paths);
        storage.initialize().unwrap();
        (
            AppState::new(storage, TokenKeys::from_secret(b"test-secret")),
            temp,
        )
    }

    fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: id.to_string(),
            name: "Test".to_string(),
            email: format!("{id}@example.com"),
        }
    }

    fn create_request(title: &str, amount: f64, date: &str, category: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            title: Some(title.to_string()),
            amount: Some(amount),
            date: Some(date.to_string()),
            category: Some(category.to_string()),
        }
    }

    async fn seed_tx(state: &AppState, owner: &str) -> StoredTransaction {
        let (_, Json(tx)) = create_transaction(
            Auth(user(owner)),
            State(state.clone()),
            Json(create_request("Coffee", -4.5, "2024-01-01", "Food")),
        )
        .await
        .unwrap();
        tx
    }

    #[test]
    fn parse_date_accepts_rfc3339_and_plain_date() {
        assert!(parse_date("2024-01-01T12:30:00Z").is_ok());
        assert!(parse_date("2024-01-01T12:30:00+02:00").is_ok());

        let midnight = parse_date("2024-01-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2024-13-40").is_err());
    }

    #[tokio::test]
    async fn fresh_user_has_empty_list() {
        let (state, _temp) = test_state();

        let Json(txs) = list_transactions(Auth(user("user-a")), State(state))
            .await
            .unwrap();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn create_sets_owner_from_requester() {
        let (state, _temp) = test_state();

        let tx = seed_tx(&state, "user-a").await;
        assert_eq!(tx.owner_user_id, "user-a");
        assert_eq!(tx.title, "Coffee");
        assert_eq!(tx.amount, -4.5);
        assert_eq!(tx.category, "Food");
    }

    #[tokio::test]
    async fn create_accepts_zero_amount() {
        let (state, _temp) = test_state();

        let result = create_transaction(
            Auth(user("user-a")),
            State(state),
            Json(create_request("Placeholder", 0.0, "2024-01-01", "Misc")),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_missing_field_is_400() {
        let (state, _temp) = test_state();

        let err = create_transaction(
            Auth(user("user-a")),
            State(state),
            Json(CreateTransactionRequest {
                title: Some("Coffee".to_string()),
                amount: None,
                date: Some("2024-01-01".to_string()),
                category: Some("Food".to_string()),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Please fill all fields");
    }

    #[tokio::test]
    async fn create_invalid_date_is_400() {
        let (state, _temp) = test_state();

        let err = create_transaction(
            Auth(user("user-a")),
            State(state),
            Json(create_request("Coffee", -4.5, "not-a-date", "Food")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid date");
    }

    #[tokio::test]
    async fn list_is_scoped_to_caller() {
        let (state, _temp) = test_state();

        seed_tx(&state, "user-a").await;
        seed_tx(&state, "user-a").await;
        seed_tx(&state, "user-b").await;

        let Json(txs) = list_transactions(Auth(user("user-a")), State(state))
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
        assert!(txs.iter().all(|tx| tx.owner_user_id == "user-a"));
    }

    #[tokio::test]
    async fn get_own_transaction_succeeds() {
        let (state, _temp) = test_state();

        let tx = seed_tx(&state, "user-a").await;
        let Json(loaded) = get_transaction(
            Auth(user("user-a")),
            State(state),
            Path(tx.id.clone()),
        )
        .await
        .unwrap();

        assert_eq!(loaded, tx);
    }

    #[tokio::test]
    async fn foreign_transaction_is_403_not_404() {
        let (state, _temp) = test_state();

        let tx = seed_tx(&state, "user-a").await;

        let err = get_transaction(
            Auth(user("user-b")),
            State(state.clone()),
            Path(tx.id.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err = delete_transaction(Auth(user("user-b")), State(state.clone()), Path(tx.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err = update_transaction(
            Auth(user("user-b")),
            State(state.clone()),
            Path(tx.id.clone()),
            Json(UpdateTransactionRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        // Still intact and owned by user-a.
        let Json(loaded) = get_transaction(
            Auth(user("user-a")),
            State(state.clone()),
            Path(tx.id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(loaded.owner_user_id, "user-a");

        // Each denial left an audit trail.
        let storage = state.storage();
        let repo = crate::storage::AuditRepository::new(&storage);
        let date = Utc::now().format("%Y-%m-%d").to_string();
        let denials = repo
            .read_events(&date)
            .unwrap()
            .into_iter()
            .filter(|e| e.event_type == crate::storage::AuditEventType::PermissionDenied)
            .count();
        assert_eq!(denials, 3);
    }

    #[tokio::test]
    async fn missing_transaction_is_404_for_everyone() {
        let (state, _temp) = test_state();

        for caller in ["user-a", "user-b"] {
            let err = get_transaction(
                Auth(user(caller)),
                State(state.clone()),
                Path("no-such-id".to_string()),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND);

            let err = update_transaction(
                Auth(user(caller)),
                State(state.clone()),
                Path("no-such-id".to_string()),
                Json(UpdateTransactionRequest::default()),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND);

            let err = delete_transaction(
                Auth(user(caller)),
                State(state.clone()),
                Path("no-such-id".to_string()),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let (state, _temp) = test_state();

        let tx = seed_tx(&state, "user-a").await;

        let Json(updated) = update_transaction(
            Auth(user("user-a")),
            State(state),
            Path(tx.id.clone()),
            Json(UpdateTransactionRequest {
                amount: Some(-6.0),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.amount, -6.0);
        // Omitted fields are untouched.
        assert_eq!(updated.title, tx.title);
        assert_eq!(updated.date, tx.date);
        assert_eq!(updated.category, tx.category);
        assert_eq!(updated.owner_user_id, tx.owner_user_id);
        assert!(updated.updated_at >= tx.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_empty_title_and_bad_date() {
        let (state, _temp) = test_state();

        let tx = seed_tx(&state, "user-a").await;

        let err = update_transaction(
            Auth(user("user-a")),
            State(state.clone()),
            Path(tx.id.clone()),
            Json(UpdateTransactionRequest {
                title: Some("   ".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = update_transaction(
            Auth(user("user-a")),
            State(state),
            Path(tx.id),
            Json(UpdateTransactionRequest {
                date: Some("garbage".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid date");
    }

    #[tokio::test]
    async fn delete_removes_and_reports() {
        let (state, _temp) = test_state();

        let tx = seed_tx(&state, "user-a").await;

        let Json(response) = delete_transaction(
            Auth(user("user-a")),
            State(state.clone()),
            Path(tx.id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(response.message, "Transaction deleted");

        let err = get_transaction(Auth(user("user-a")), State(state), Path(tx.id))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_is_sorted_newest_first() {
        let (state, _temp) = test_state();

        for date in ["2024-01-01", "2024-03-01", "2024-02-01"] {
            create_transaction(
                Auth(user("user-a")),
                State(state.clone()),
                Json(create_request("Entry", 1.0, date, "Misc")),
            )
            .await
            .unwrap();
        }

        let Json(txs) = list_transactions(Auth(user("user-a")), State(state))
            .await
            .unwrap();
        let dates: Vec<String> = txs
            .iter()
            .map(|tx| tx.date.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }
}
