//! # Stock Movement
//!
//! The single choke point for every stock write.
//!
//! ## Delta Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  Every mutation expresses its stock effect as a signed delta:          │
//! │                                                                         │
//! │  purchase create      +quantity      purchase delete     −quantity     │
//! │  sale create          −quantity*     sale delete         +quantity     │
//! │  sales return create  +quantity      sales return delete −quantity     │
//! │  purchase return      −quantity      purchase ret delete +quantity     │
//! │                                                                         │
//! │  * the sale path uses the guarded variant: the availability check      │
//! │    and the decrement are one UPDATE statement, so two concurrent       │
//! │    sales cannot both pass the check and oversell.                      │
//! │                                                                         │
//! │  Because every effect is a delta, every mutation has a well-defined    │
//! │  inverse and deletes restore the stock they once moved.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions take `&mut SqliteConnection` so they compose into the
//! caller's transaction; they never open one of their own.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Applies a signed stock delta unconditionally.
///
/// ## Arguments
/// * `product_id` - Product to adjust
/// * `delta` - Change in stock (positive for goods in, negative for goods out)
///
/// ## Returns
/// * `Err(DbError::NotFound)` - Product doesn't exist
///
/// Reversal paths (deletes, return updates) may drive stock negative;
/// that is accepted and visible rather than silently clamped.
pub(crate) async fn apply_delta(
    conn: &mut SqliteConnection,
    product_id: &str,
    delta: i64,
) -> DbResult<()> {
    debug!(id = %product_id, delta = %delta, "Applying stock delta");

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .bind(delta)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", product_id));
    }

    Ok(())
}

/// Deducts stock only when enough is available.
///
/// ## Atomicity
/// The availability check and the decrement are a single UPDATE
/// (`... WHERE id = ?1 AND stock >= ?2`). Zero affected rows means the
/// guard refused; a follow-up read tells a missing product apart from an
/// insufficient shelf and names the available quantity for the caller.
///
/// ## Returns
/// * `Err(DbError::InsufficientStock)` - Guard refused the decrement
/// * `Err(DbError::NotFound)` - Product doesn't exist
pub(crate) async fn deduct_guarded(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    debug!(id = %product_id, quantity = %quantity, "Guarded stock deduction");

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, stock FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *conn)
                .await?;

        return match row {
            Some((name, available)) => Err(DbError::InsufficientStock {
                name,
                available,
                requested: quantity,
            }),
            None => Err(DbError::not_found("Product", product_id)),
        };
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db_with_product(stock: i64) -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create("Rice", stock).await.unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_apply_delta_moves_stock_both_ways() {
        let (db, id) = db_with_product(10).await;
        let mut conn = db.pool().acquire().await.unwrap();

        apply_delta(&mut conn, &id, 5).await.unwrap();
        apply_delta(&mut conn, &id, -12).await.unwrap();
        drop(conn);

        let product = db.products().get(&id).await.unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_apply_delta_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let err = apply_delta(&mut conn, "no-such-id", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_guarded_deduct_names_available() {
        let (db, id) = db_with_product(6).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let err = deduct_guarded(&mut conn, &id, 10).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                name,
                available,
                requested,
            } => {
                assert_eq!(name, "Rice");
                assert_eq!(available, 6);
                assert_eq!(requested, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
        drop(conn);

        // Refused guard must leave stock untouched
        let product = db.products().get(&id).await.unwrap();
        assert_eq!(product.stock, 6);
    }

    #[tokio::test]
    async fn test_guarded_deduct_takes_exact_stock() {
        let (db, id) = db_with_product(6).await;
        let mut conn = db.pool().acquire().await.unwrap();

        deduct_guarded(&mut conn, &id, 6).await.unwrap();
        drop(conn);

        let product = db.products().get(&id).await.unwrap();
        assert_eq!(product.stock, 0);
    }
}
