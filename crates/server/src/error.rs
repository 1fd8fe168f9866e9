//! Unified error handling for the service.
//!
//! Every failure a handler can produce funnels through [`AppError`], which
//! maps the domain taxonomy onto the external surface: not-found → 404,
//! validation → 400 with the offending field named, constraint conflicts →
//! 409, everything else → 500 with the detail logged but not echoed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource lookup failed.
    #[error("{resource} not found with id {id}")]
    NotFound {
        resource: &'static str,
        id: i32,
    },

    /// Input rejected before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bad request from client (e.g. a referential failure the store caught
    /// after the validation pre-check passed).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Store-level constraint conflict (duplicate unique field, or deleting
    /// a row that dependent rows still reference).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(detail) | StoreError::ReferencedBy(detail) => {
                Self::Conflict(detail)
            }
            // The schema's FK constraint is the authoritative referential
            // guard; a violation here lost the race against a concurrent
            // delete and is still the caller's bad reference.
            StoreError::ForeignKeyViolation(detail) => Self::BadRequest(detail),
            other => Self::Store(other),
        }
    }
}

/// Uniform externally visible error shape.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, field) = match &self {
            Self::NotFound { .. } | Self::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "not_found", None)
            }
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation", Some(e.field())),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation", None),
            Self::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            Self::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", None),
        };

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                error: kind,
                message,
                field,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound {
            resource: "order",
            id: 123,
        };
        assert_eq!(err.to_string(), "order not found with id 123");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound {
                resource: "customer",
                id: 1
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Validation(ValidationError::MissingField("name"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Conflict("email already exists".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Store(StoreError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Store(StoreError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_constraint_errors_become_conflicts() {
        let err: AppError = StoreError::ReferencedBy("customer 1".to_owned()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = StoreError::ForeignKeyViolation("no order 9".to_owned()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
