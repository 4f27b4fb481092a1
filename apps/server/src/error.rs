//! Error types for the REST surface.
//!
//! ## Error Mapping
//! ```text
//! ValidationError            → 400 { "error": message }
//! DbError::NotFound          → 404 { "error": message }
//! DbError::UniqueViolation   → 400 { "error": message }
//! DbError::InsufficientStock → 400 { "error": message }
//! DbError::ProductInUse      → 400 { "error": message, "relatedRecords": {...} }
//! DbError::InvalidSecretKey  → 401 { "error": message }
//! Bad/missing bearer token   → 401 { "error": message }
//! Storage failures           → 500 { "error": "Internal server error" }
//! ```
//!
//! Storage failures never leak their message to the client. The real error
//! is logged and the body carries a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use till_core::ValidationError;
use till_db::DbError;

/// Errors a request handler can surface to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed validation before any storage work ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage layer refused or failed the operation.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Malformed request outside the field validators (e.g. an empty
    /// sale item list).
    #[error("{0}")]
    BadRequest(String),

    /// Resource missing for reasons the storage layer does not name
    /// itself (e.g. no company row yet).
    #[error("{0}")]
    NotFound(String),

    /// Missing, malformed, or expired bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Anything the other variants cannot name.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(err) => {
                (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::Db(err) => db_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a storage error to an HTTP status and JSON body.
fn db_response(err: DbError) -> (StatusCode, serde_json::Value) {
    match err {
        DbError::NotFound { .. } => (StatusCode::NOT_FOUND, json!({ "error": err.to_string() })),

        // Business-rule refusals keep their precise message.
        DbError::UniqueViolation { .. }
        | DbError::ForeignKeyViolation { .. }
        | DbError::InsufficientStock { .. }
        | DbError::SellingPriceNotSet { .. }
        | DbError::ReturnTooLarge { .. }
        | DbError::CompanyExists => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),

        // The delete guard ships the referencing rows so the frontend can
        // show the operator what blocks the deletion.
        DbError::ProductInUse { related } => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Cannot delete product. Related records exist",
                "relatedRecords": related,
            }),
        ),

        DbError::InvalidSecretKey => {
            (StatusCode::UNAUTHORIZED, json!({ "error": err.to_string() }))
        }

        // Infrastructure failures: log the real error, answer generically.
        DbError::ConnectionFailed(_)
        | DbError::MigrationFailed(_)
        | DbError::QueryFailed(_)
        | DbError::TransactionFailed(_)
        | DbError::PoolExhausted
        | DbError::Internal(_) => {
            tracing::error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            )
        }
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;
