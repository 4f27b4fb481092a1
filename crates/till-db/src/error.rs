//! # Database Error Types
//!
//! Error types for storage operations and the transactional rules the
//! storage layer enforces.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the server) ← HTTP status + JSON body                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business-rule failures that can only be decided inside a transaction
//! (stock guard, return caps, the product-delete guard) live here too, so
//! repositories can fail the transaction with a precise reason instead of
//! surfacing a bare constraint error.

use thiserror::Error;
use till_core::RelatedRecords;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_optional` returns no row for an ID
    /// - An UPDATE/DELETE affects zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate product name
    /// - Inserting a duplicate supplier name
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent product_id or supplier_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The guarded stock decrement found fewer units than requested.
    ///
    /// ## When This Occurs
    /// - Selling more than the shelf holds
    /// - Re-pointing a sale to a product with too little stock
    #[error("Not enough stock for {name}. Available: {available}, requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A sale was attempted against a product whose selling price is
    /// still at its creation default of zero.
    #[error("Selling price not set for {name}")]
    SellingPriceNotSet { name: String },

    /// A return asked for more units than the originating transaction
    /// recorded.
    #[error("Return quantity {requested} exceeds recorded quantity {max}")]
    ReturnTooLarge { requested: i64, max: i64 },

    /// Product delete refused because transactional rows reference it.
    ///
    /// Carries every referencing row grouped per table so the caller can
    /// show the operator exactly what blocks the deletion.
    #[error("Cannot delete product. Related records exist")]
    ProductInUse { related: RelatedRecords },

    /// Setup was attempted while a company row already exists.
    #[error("Company setup already exists")]
    CompanyExists,

    /// Login secret did not match the stored hash.
    #[error("Invalid secret key")]
    InvalidSecretKey,

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for constraints:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Product", "p-123");
        assert_eq!(err.to_string(), "Product not found: p-123");
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = DbError::InsufficientStock {
            name: "Rice".to_string(),
            available: 6,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Not enough stock for Rice. Available: 6, requested: 10"
        );
    }

    #[test]
    fn test_product_in_use_carries_payload() {
        let err = DbError::ProductInUse {
            related: RelatedRecords::default(),
        };
        match err {
            DbError::ProductInUse { related } => assert!(related.is_empty()),
            _ => panic!("wrong variant"),
        }
    }
}
