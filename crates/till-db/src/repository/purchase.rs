//! # Purchase Repository
//!
//! Database operations for purchases (stock in).
//!
//! ## Purchase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Purchase Lifecycle                                 │
//! │                                                                         │
//! │  CREATE (one transaction)                                              │
//! │    ├── load product (404 if missing)                                   │
//! │    ├── load supplier (404 if missing)                                  │
//! │    ├── snapshot product_name + unit_price = product.purchase_price     │
//! │    ├── total = quantity × unit_price                                   │
//! │    ├── INSERT purchase row                                             │
//! │    └── stock += quantity                                               │
//! │                                                                         │
//! │  DELETE (one transaction)                                              │
//! │    ├── reverse each purchase return (+its quantity)                    │
//! │    ├── DELETE purchase (FK cascade removes the returns)                │
//! │    └── stock −= quantity                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no price override on the create path: a purchase always books
//! at the product's current buying price. Adjusting the price first through
//! the stock manager is the supported flow.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use till_core::{Product, Purchase};

/// Row shape for the purchase list: snapshots plus the joined supplier name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListRow {
    pub id: String,
    pub product_name: String,
    pub supplier_name: String,
    pub quantity: i64,
    #[serde(rename = "pricePerUnit")]
    pub unit_price_cents: i64,
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
}

/// Repository for purchase database operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Books a purchase and moves the stock in.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the product and the supplier (missing → NotFound)
    /// 2. Snapshots the product name and its current buying price
    /// 3. Inserts the purchase row with `total = quantity × unit price`
    /// 4. Increments stock by `quantity`
    ///
    /// ## Returns
    /// The booked purchase with its snapshots.
    pub async fn create(
        &self,
        product_id: &str,
        supplier_id: &str,
        quantity: i64,
    ) -> DbResult<Purchase> {
        debug!(product_id = %product_id, supplier_id = %supplier_id, quantity = %quantity, "Booking purchase");

        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, purchase_price_cents, selling_price_cents, stock,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", product_id))?;

        let supplier: Option<(String,)> = sqlx::query_as("SELECT id FROM suppliers WHERE id = ?1")
            .bind(supplier_id)
            .fetch_optional(&mut *tx)
            .await?;
        if supplier.is_none() {
            return Err(DbError::not_found("Supplier", supplier_id));
        }

        let now = Utc::now();
        let purchase = Purchase {
            id: generate_purchase_id(),
            product_id: product.id.clone(),
            supplier_id: supplier_id.to_string(),
            product_name: product.name.clone(),
            quantity,
            unit_price_cents: product.purchase_price_cents,
            total_cents: product.purchase_price_cents * quantity,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, product_id, supplier_id, product_name, quantity,
                unit_price_cents, total_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(&purchase.supplier_id)
        .bind(&purchase.product_name)
        .bind(purchase.quantity)
        .bind(purchase.unit_price_cents)
        .bind(purchase.total_cents)
        .bind(purchase.created_at)
        .bind(purchase.updated_at)
        .execute(&mut *tx)
        .await?;

        stock::apply_delta(&mut tx, product_id, quantity).await?;

        tx.commit().await?;
        Ok(purchase)
    }

    /// Lists all purchases with the supplier name joined in, newest first.
    pub async fn list(&self) -> DbResult<Vec<PurchaseListRow>> {
        let rows = sqlx::query_as::<_, PurchaseListRow>(
            r#"
            SELECT p.id, p.product_name, s.name AS supplier_name, p.quantity,
                   p.unit_price_cents, p.total_cents
            FROM purchases p
            INNER JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Deletes a purchase and reverses its stock movement.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the purchase (missing → NotFound)
    /// 2. Reverses each of its purchase returns (+return quantity each)
    /// 3. Deletes the purchase; the FK cascade removes the returns
    /// 4. Decrements stock by the purchase quantity
    ///
    /// The decrement is not guarded; deleting an old purchase after the
    /// goods were sold can drive stock negative, which is left visible.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting purchase");

        let mut tx = self.pool.begin().await?;

        let purchase: Option<(String, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM purchases WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, quantity) =
            purchase.ok_or_else(|| DbError::not_found("Purchase", id))?;

        let returns: Vec<(String, i64)> = sqlx::query_as(
            "SELECT product_id, quantity FROM purchase_returns WHERE purchase_id = ?1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for (return_product_id, return_quantity) in &returns {
            stock::apply_delta(&mut tx, return_product_id, *return_quantity).await?;
        }

        sqlx::query("DELETE FROM purchases WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        stock::apply_delta(&mut tx, &product_id, -quantity).await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Helper to generate a new purchase ID.
pub fn generate_purchase_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
