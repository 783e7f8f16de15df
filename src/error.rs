// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API error type returned at the handler boundary.
//!
//! Every per-request failure is converted to an `ApiError` and serialized as
//! `{"error": "..."}`. Infrastructure detail stays in the logs; clients get
//! a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Central mapping from storage failures to HTTP responses.
///
/// Not-found maps before anything else so existence checks keep their
/// 404-before-403 ordering; unexpected storage failures surface as a generic
/// 500 with the detail logged, never echoed to the client.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(entity) => Self::not_found(format!("{entity} not found")),
            StorageError::PermissionDenied { .. } => Self::forbidden("Forbidden"),
            StorageError::AlreadyExists(_) => Self::bad_request("Already exists"),
            other => {
                tracing::error!(error = %other, "storage operation failed");
                Self::internal("Server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let fbd = ApiError::forbidden("no");
        assert_eq!(fbd.status, StatusCode::FORBIDDEN);

        let internal = ApiError::internal("oops");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }

    #[test]
    fn storage_not_found_maps_to_404() {
        let err: ApiError = StorageError::NotFound("Transaction".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Transaction not found");
    }

    #[test]
    fn storage_permission_denied_maps_to_403() {
        let err: ApiError = StorageError::PermissionDenied {
            user_id: "u1".to_string(),
            resource: "transaction".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Forbidden");
    }

    #[test]
    fn storage_io_maps_to_generic_500() {
        let io = std::io::Error::other("disk on fire");
        let err: ApiError = StorageError::Io(io).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Server error");
    }
}
