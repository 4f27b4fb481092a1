//! # Purchase Return Repository
//!
//! Database operations for goods going back to suppliers.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase Return Lifecycle                           │
//! │                                                                         │
//! │   Purchase (10 × Rice @ 50 from Acme)                                   │
//! │        │                                                                │
//! │        ▼  create(purchase, 2, refund 100, "Damaged in transit")         │
//! │   ┌──────────────────────────────────────────────┐                      │
//! │   │ quantity capped at the purchase's quantity   │                      │
//! │   │ product identity copied from the purchase    │                      │
//! │   │ refund = amount agreed with the supplier     │                      │
//! │   │ stock  −2 (unguarded; may go negative)       │                      │
//! │   └──────────────────────────────────────────────┘                      │
//! │        │                          │                                     │
//! │        ▼  update(3, 150, ...)     ▼  delete                             │
//! │   stock +(2 − 3)             stock +quantity,                           │
//! │   fields rewritten           row removed                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike sales returns, the refund here comes from the caller: it is
//! whatever the supplier agreed to credit, not a derived price. The product
//! a return touches is always the purchase's product; callers cannot point
//! one elsewhere.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use till_core::{Purchase, PurchaseReturn};

/// Row shape for the purchase return list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReturnListRow {
    pub id: String,
    pub purchase_id: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "refundAmount")]
    pub refund_cents: i64,
    pub reason: String,
}

/// Repository for purchase return database operations.
#[derive(Debug, Clone)]
pub struct PurchaseReturnRepository {
    pool: SqlitePool,
}

impl PurchaseReturnRepository {
    /// Creates a new PurchaseReturnRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseReturnRepository { pool }
    }

    /// Books a return against a purchase and takes the goods out of stock.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the purchase (missing → NotFound)
    /// 2. Caps the quantity at 1..=purchase quantity
    /// 3. Copies product id and frozen name from the purchase
    /// 4. Inserts the return with the supplier-agreed refund
    /// 5. Subtracts the quantity from stock, unguarded
    pub async fn create(
        &self,
        purchase_id: &str,
        quantity: i64,
        refund_cents: i64,
        reason: &str,
    ) -> DbResult<PurchaseReturn> {
        debug!(purchase_id = %purchase_id, quantity = %quantity, "Processing purchase return");

        let mut tx = self.pool.begin().await?;

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, product_id, supplier_id, product_name, quantity,
                   unit_price_cents, total_cents, created_at, updated_at
            FROM purchases
            WHERE id = ?1
            "#,
        )
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Purchase", purchase_id))?;

        if quantity < 1 || quantity > purchase.quantity {
            return Err(DbError::ReturnTooLarge {
                requested: quantity,
                max: purchase.quantity,
            });
        }

        let now = Utc::now();
        let record = PurchaseReturn {
            id: generate_purchase_return_id(),
            purchase_id: purchase.id.clone(),
            product_id: purchase.product_id.clone(),
            product_name: purchase.product_name.clone(),
            quantity,
            refund_cents,
            reason: reason.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO purchase_returns (
                id, purchase_id, product_id, product_name, quantity,
                refund_cents, reason, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.id)
        .bind(&record.purchase_id)
        .bind(&record.product_id)
        .bind(&record.product_name)
        .bind(record.quantity)
        .bind(record.refund_cents)
        .bind(&record.reason)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await?;

        stock::apply_delta(&mut tx, &record.product_id, -quantity).await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Lists all purchase returns, newest first.
    pub async fn list(&self) -> DbResult<Vec<PurchaseReturnListRow>> {
        let rows = sqlx::query_as::<_, PurchaseReturnListRow>(
            r#"
            SELECT id, purchase_id, product_name, quantity, refund_cents, reason
            FROM purchase_returns
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Rewrites a return's quantity, refund and reason, moving stock by the
    /// quantity difference.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the return and its purchase (missing → NotFound)
    /// 2. Re-caps the quantity at 1..=purchase quantity
    /// 3. Moves stock by `old − new` (a deeper return takes more out)
    pub async fn update(
        &self,
        id: &str,
        quantity: i64,
        refund_cents: i64,
        reason: &str,
    ) -> DbResult<PurchaseReturn> {
        debug!(id = %id, quantity = %quantity, "Updating purchase return");

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, PurchaseReturn>(
            r#"
            SELECT id, purchase_id, product_id, product_name, quantity,
                   refund_cents, reason, created_at, updated_at
            FROM purchase_returns
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Purchase return", id))?;

        let purchase_quantity: Option<(i64,)> =
            sqlx::query_as("SELECT quantity FROM purchases WHERE id = ?1")
                .bind(&current.purchase_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (max,) = purchase_quantity
            .ok_or_else(|| DbError::not_found("Purchase", &current.purchase_id))?;

        if quantity < 1 || quantity > max {
            return Err(DbError::ReturnTooLarge {
                requested: quantity,
                max,
            });
        }

        let delta = current.quantity - quantity;
        if delta != 0 {
            stock::apply_delta(&mut tx, &current.product_id, delta).await?;
        }

        let now = Utc::now();
        let updated = PurchaseReturn {
            quantity,
            refund_cents,
            reason: reason.to_string(),
            updated_at: now,
            ..current
        };

        sqlx::query(
            r#"
            UPDATE purchase_returns
            SET quantity = ?2, refund_cents = ?3, reason = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&updated.id)
        .bind(updated.quantity)
        .bind(updated.refund_cents)
        .bind(&updated.reason)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Deletes a return and puts the goods back in stock.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting purchase return");

        let mut tx = self.pool.begin().await?;

        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM purchase_returns WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, quantity) =
            row.ok_or_else(|| DbError::not_found("Purchase return", id))?;

        stock::apply_delta(&mut tx, &product_id, quantity).await?;

        sqlx::query("DELETE FROM purchase_returns WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Helper to generate a new purchase return ID.
pub fn generate_purchase_return_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Books 10 Rice at 50 from Acme and returns (purchase_id, product_id).
    async fn booked_purchase(db: &Database) -> (String, String) {
        let product = db.products().create("Rice", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&product.id, 0, 50, 80)
            .await
            .unwrap();
        let supplier = db
            .suppliers()
            .create("Acme Traders", "0712345678", "12 Market Street, Old Town")
            .await
            .unwrap();
        let purchase = db
            .purchases()
            .create(&product.id, &supplier.id, 10)
            .await
            .unwrap();
        (purchase.id, product.id)
    }

    #[tokio::test]
    async fn test_return_to_supplier_reduces_stock() {
        let db = db().await;
        let (purchase_id, product_id) = booked_purchase(&db).await;
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 10);

        let record = db
            .purchase_returns()
            .create(&purchase_id, 2, 100, "Damaged in transit")
            .await
            .unwrap();

        assert_eq!(record.quantity, 2);
        assert_eq!(record.refund_cents, 100);
        assert_eq!(record.product_id, product_id);
        assert_eq!(record.product_name, "Rice");
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        let rows = db.purchase_returns().list().await.unwrap();
        assert_eq!(rows.len(), 1);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["purchaseId"], purchase_id);
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["refundAmount"], 100);
        assert_eq!(json["reason"], "Damaged in transit");
    }

    #[tokio::test]
    async fn test_return_capped_at_purchase_quantity() {
        let db = db().await;
        let (purchase_id, product_id) = booked_purchase(&db).await;

        let err = db
            .purchase_returns()
            .create(&purchase_id, 11, 550, "Entire shipment bad")
            .await
            .unwrap_err();
        match err {
            DbError::ReturnTooLarge { requested, max } => {
                assert_eq!(requested, 11);
                assert_eq!(max, 10);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 10);
        assert!(db.purchase_returns().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_return_rejects_zero_quantity() {
        let db = db().await;
        let (purchase_id, _) = booked_purchase(&db).await;

        let err = db
            .purchase_returns()
            .create(&purchase_id, 0, 100, "Nothing")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ReturnTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_return_missing_purchase() {
        let db = db().await;

        let err = db
            .purchase_returns()
            .create("no-such-id", 1, 50, "Lost")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_return_keeps_purchase_frozen_name() {
        let db = db().await;
        let (purchase_id, product_id) = booked_purchase(&db).await;

        // Rename after the purchase; the return copies the purchase snapshot
        db.products()
            .update(&product_id, "Basmati Rice", 10)
            .await
            .unwrap();

        let record = db
            .purchase_returns()
            .create(&purchase_id, 1, 50, "Wrong grade")
            .await
            .unwrap();
        assert_eq!(record.product_name, "Rice");
    }

    #[tokio::test]
    async fn test_update_moves_stock_by_difference() {
        let db = db().await;
        let (purchase_id, product_id) = booked_purchase(&db).await;
        let record = db
            .purchase_returns()
            .create(&purchase_id, 2, 100, "Damaged in transit")
            .await
            .unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        // 2 → 3 sends one more unit back to the supplier
        let updated = db
            .purchase_returns()
            .update(&record.id, 3, 150, "Third unit also damaged")
            .await
            .unwrap();
        assert_eq!(updated.refund_cents, 150);
        assert_eq!(updated.reason, "Third unit also damaged");
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 7);

        // 3 → 1 brings two back onto the shelf
        db.purchase_returns()
            .update(&record.id, 1, 50, "Only one damaged after all")
            .await
            .unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 9);
    }

    #[tokio::test]
    async fn test_update_recaps_against_purchase() {
        let db = db().await;
        let (purchase_id, product_id) = booked_purchase(&db).await;
        let record = db
            .purchase_returns()
            .create(&purchase_id, 2, 100, "Damaged in transit")
            .await
            .unwrap();

        let err = db
            .purchase_returns()
            .update(&record.id, 11, 550, "Everything")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ReturnTooLarge { .. }));

        // Untouched on failure
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);
        assert_eq!(db.purchase_returns().list().await.unwrap()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_delete_restores_stock() {
        let db = db().await;
        let (purchase_id, product_id) = booked_purchase(&db).await;
        let record = db
            .purchase_returns()
            .create(&purchase_id, 2, 100, "Damaged in transit")
            .await
            .unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        db.purchase_returns().delete(&record.id).await.unwrap();

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 10);
        assert!(db.purchase_returns().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_return() {
        let db = db().await;

        let err = db.purchase_returns().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
