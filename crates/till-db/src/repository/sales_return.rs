//! # Sales Return Repository
//!
//! Database operations for goods coming back from customers.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sales Return Lifecycle                             │
//! │                                                                         │
//! │   Sale (4 × Rice @ 80)                                                  │
//! │        │                                                                │
//! │        ▼  create(sale, 2, "Changed their mind")                         │
//! │   ┌──────────────────────────────────────────────┐                      │
//! │   │ quantity capped at the sale's quantity       │                      │
//! │   │ refund = 2 × 80 (sale's frozen unit price)   │                      │
//! │   │ stock  +2                                    │                      │
//! │   └──────────────────────────────────────────────┘                      │
//! │        │                          │                                     │
//! │        ▼  update(3)               ▼  delete                             │
//! │   refund = 3 × 80            stock −quantity,                           │
//! │   stock  +(3 − 2)            row removed                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The refund is always derived from the sale's frozen unit price; callers
//! never supply an amount. Each return is capped at the sale's recorded
//! quantity on its own, without summing sibling returns.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use till_core::{Sale, SalesReturn};

/// Row shape for the sales return list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesReturnListRow {
    pub id: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "refundAmount")]
    pub refund_cents: i64,
    pub reason: String,
    pub created_at: chrono::DateTime<Utc>,
}

/// Repository for sales return database operations.
#[derive(Debug, Clone)]
pub struct SalesReturnRepository {
    pool: SqlitePool,
}

impl SalesReturnRepository {
    /// Creates a new SalesReturnRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesReturnRepository { pool }
    }

    /// Books a return against a sale and restocks the goods.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the sale (missing → NotFound)
    /// 2. Caps the quantity at 1..=sale quantity
    /// 3. Computes the refund from the sale's frozen unit price
    /// 4. Inserts the return, copying product id and name from the sale
    /// 5. Adds the quantity back to stock
    pub async fn create(
        &self,
        sale_id: &str,
        return_quantity: i64,
        reason: &str,
    ) -> DbResult<SalesReturn> {
        debug!(sale_id = %sale_id, quantity = %return_quantity, "Processing sales return");

        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, product_name, quantity, unit_price_cents,
                   total_cents, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        if return_quantity < 1 || return_quantity > sale.quantity {
            return Err(DbError::ReturnTooLarge {
                requested: return_quantity,
                max: sale.quantity,
            });
        }

        let now = Utc::now();
        let record = SalesReturn {
            id: generate_sales_return_id(),
            sale_id: sale.id.clone(),
            product_id: sale.product_id.clone(),
            product_name: sale.product_name.clone(),
            quantity: return_quantity,
            refund_cents: sale.unit_price().multiply_quantity(return_quantity).cents(),
            reason: reason.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales_returns (
                id, sale_id, product_id, product_name, quantity, refund_cents,
                reason, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.id)
        .bind(&record.sale_id)
        .bind(&record.product_id)
        .bind(&record.product_name)
        .bind(record.quantity)
        .bind(record.refund_cents)
        .bind(&record.reason)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await?;

        stock::apply_delta(&mut tx, &record.product_id, return_quantity).await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Lists all sales returns, newest first.
    pub async fn list(&self) -> DbResult<Vec<SalesReturnListRow>> {
        let rows = sqlx::query_as::<_, SalesReturnListRow>(
            r#"
            SELECT id, product_name, quantity, refund_cents, reason, created_at
            FROM sales_returns
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Changes the returned quantity, moving stock by the difference.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the return and its sale (missing → NotFound)
    /// 2. Re-caps the quantity at 1..=sale quantity
    /// 3. Recomputes the refund from the sale's frozen unit price
    /// 4. Moves stock by `new − old`
    pub async fn update(&self, id: &str, quantity: i64) -> DbResult<SalesReturn> {
        debug!(id = %id, quantity = %quantity, "Updating sales return");

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, SalesReturn>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity, refund_cents,
                   reason, created_at, updated_at
            FROM sales_returns
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sales return", id))?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, product_name, quantity, unit_price_cents,
                   total_cents, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(&current.sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", &current.sale_id))?;

        if quantity < 1 || quantity > sale.quantity {
            return Err(DbError::ReturnTooLarge {
                requested: quantity,
                max: sale.quantity,
            });
        }

        let delta = quantity - current.quantity;
        if delta != 0 {
            stock::apply_delta(&mut tx, &current.product_id, delta).await?;
        }

        let now = Utc::now();
        let updated = SalesReturn {
            quantity,
            refund_cents: sale.unit_price().multiply_quantity(quantity).cents(),
            updated_at: now,
            ..current
        };

        sqlx::query(
            r#"
            UPDATE sales_returns
            SET quantity = ?2, refund_cents = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&updated.id)
        .bind(updated.quantity)
        .bind(updated.refund_cents)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancels a return: takes the restocked quantity back out and deletes
    /// the row.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Canceling sales return");

        let mut tx = self.pool.begin().await?;

        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM sales_returns WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, quantity) = row.ok_or_else(|| DbError::not_found("Sales return", id))?;

        stock::apply_delta(&mut tx, &product_id, -quantity).await?;

        sqlx::query("DELETE FROM sales_returns WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Helper to generate a new sales return ID.
pub fn generate_sales_return_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::sale::SaleItemInput;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Sells 4 Rice at 80 from a shelf of 10 and returns the sale id.
    async fn booked_sale(db: &Database) -> (String, String) {
        let product = db.products().create("Rice", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&product.id, 10, 50, 80)
            .await
            .unwrap();
        db.sales()
            .create(&[SaleItemInput {
                product_id: product.id.clone(),
                quantity: 4,
            }])
            .await
            .unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();
        (sale_id, product.id)
    }

    #[tokio::test]
    async fn test_return_restocks_and_refunds() {
        let db = db().await;
        let (sale_id, product_id) = booked_sale(&db).await;

        let record = db
            .sales_returns()
            .create(&sale_id, 2, "Changed their mind")
            .await
            .unwrap();

        assert_eq!(record.quantity, 2);
        assert_eq!(record.refund_cents, 160);
        assert_eq!(record.product_name, "Rice");
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        let rows = db.sales_returns().list().await.unwrap();
        assert_eq!(rows.len(), 1);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["refundAmount"], 160);
        assert_eq!(json["reason"], "Changed their mind");
        assert!(json["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_return_cannot_exceed_sale_quantity() {
        let db = db().await;
        let (sale_id, product_id) = booked_sale(&db).await;

        let err = db
            .sales_returns()
            .create(&sale_id, 5, "Too many")
            .await
            .unwrap_err();
        match err {
            DbError::ReturnTooLarge { requested, max } => {
                assert_eq!(requested, 5);
                assert_eq!(max, 4);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 6);
        assert!(db.sales_returns().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_return_rejects_zero_quantity() {
        let db = db().await;
        let (sale_id, _) = booked_sale(&db).await;

        let err = db
            .sales_returns()
            .create(&sale_id, 0, "Nothing")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ReturnTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_return_missing_sale() {
        let db = db().await;

        let err = db
            .sales_returns()
            .create("no-such-sale", 1, "Lost")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_refund_uses_frozen_sale_price() {
        let db = db().await;
        let (sale_id, product_id) = booked_sale(&db).await;

        // Reprice the product after the sale; the refund must not move
        db.products()
            .set_stock_and_prices(&product_id, 6, 50, 999)
            .await
            .unwrap();

        let record = db
            .sales_returns()
            .create(&sale_id, 2, "Repriced later")
            .await
            .unwrap();
        assert_eq!(record.refund_cents, 160);
    }

    #[tokio::test]
    async fn test_update_moves_stock_by_difference() {
        let db = db().await;
        let (sale_id, product_id) = booked_sale(&db).await;
        let record = db
            .sales_returns()
            .create(&sale_id, 2, "Damaged")
            .await
            .unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        // 2 → 3 restocks one more and reprices the refund
        let updated = db.sales_returns().update(&record.id, 3).await.unwrap();
        assert_eq!(updated.refund_cents, 240);
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 9);

        // 3 → 1 takes two back out
        let updated = db.sales_returns().update(&record.id, 1).await.unwrap();
        assert_eq!(updated.refund_cents, 80);
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 7);
    }

    #[tokio::test]
    async fn test_update_recaps_against_sale() {
        let db = db().await;
        let (sale_id, product_id) = booked_sale(&db).await;
        let record = db
            .sales_returns()
            .create(&sale_id, 2, "Damaged")
            .await
            .unwrap();

        let err = db.sales_returns().update(&record.id, 5).await.unwrap_err();
        assert!(matches!(err, DbError::ReturnTooLarge { .. }));

        // Untouched on failure
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);
        assert_eq!(db.sales_returns().list().await.unwrap()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_cancel_takes_restock_back() {
        let db = db().await;
        let (sale_id, product_id) = booked_sale(&db).await;
        let record = db
            .sales_returns()
            .create(&sale_id, 2, "Damaged")
            .await
            .unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        db.sales_returns().delete(&record.id).await.unwrap();

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 6);
        assert!(db.sales_returns().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_missing_return() {
        let db = db().await;

        let err = db.sales_returns().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
