//! # Sale Repository
//!
//! Database operations for sales (stock out) and receipts.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Multi-Item Checkout (all-or-nothing)                    │
//! │                                                                         │
//! │  POST /sales { items: [{productId, quantity}, ...] }                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                      │
//! │    for each item, in order:                                            │
//! │      ├── load product            → 404 if missing                      │
//! │      ├── selling price set?      → 400 if still zero                   │
//! │      ├── guarded stock decrement → 400 naming the shortage             │
//! │      └── INSERT sale row (snapshot name + unit price)                  │
//! │  COMMIT ──────────► receipt { items, totalAmount }                     │
//! │                                                                         │
//! │  Any failure rolls the whole batch back: a receipt either prints       │
//! │  completely or not at all, and stock moves match it exactly.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Receipts are computed per call and returned inline, never persisted.
//! Each sale row is one receipt line; re-reading a sale later reconstructs
//! figures from the rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use till_core::{Money, Product, Receipt, ReceiptItem, Sale};

/// One requested line of a checkout.
#[derive(Debug, Clone)]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: i64,
}

/// Row shape for the sale list: snapshots, the product's current buying
/// price, and the margin made on the line.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleListRow {
    pub id: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "sellingPricePerUnit")]
    pub unit_price_cents: i64,
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
    #[serde(rename = "purchasePrice")]
    pub purchase_price_cents: i64,
    #[serde(rename = "profit")]
    pub profit_cents: i64,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Runs a checkout: one sale row per item, one receipt for the batch.
    ///
    /// ## What This Does (one transaction)
    /// Per item, in order: load the product (missing → NotFound), require a
    /// set selling price, take the stock through the guarded decrement,
    /// insert the sale row with frozen name and unit price. Any failure
    /// rolls every prior item back.
    ///
    /// ## Returns
    /// The receipt for the whole batch. Never persisted.
    pub async fn create(&self, items: &[SaleItemInput]) -> DbResult<Receipt> {
        debug!(items = items.len(), "Processing checkout");

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let mut receipt_items = Vec::with_capacity(items.len());
        let mut total = Money::zero();

        for item in items {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, purchase_price_cents, selling_price_cents, stock,
                       created_at, updated_at
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(&item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &item.product_id))?;

            if !product.has_selling_price() {
                return Err(DbError::SellingPriceNotSet { name: product.name });
            }

            stock::deduct_guarded(&mut tx, &item.product_id, item.quantity).await?;

            let unit_price = product.selling_price();
            let line_total = unit_price.multiply_quantity(item.quantity);

            sqlx::query(
                r#"
                INSERT INTO sales (
                    id, product_id, product_name, quantity, unit_price_cents,
                    total_cents, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(generate_sale_id())
            .bind(&product.id)
            .bind(&product.name)
            .bind(item.quantity)
            .bind(unit_price.cents())
            .bind(line_total.cents())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            receipt_items.push(ReceiptItem {
                product_name: product.name,
                quantity: item.quantity,
                unit_price_cents: unit_price.cents(),
                line_total_cents: line_total.cents(),
            });
            total += line_total;
        }

        tx.commit().await?;

        Ok(Receipt {
            receipt_number: generate_receipt_number(now),
            date: now,
            items: receipt_items,
            total_cents: total.cents(),
        })
    }

    /// Lists all sales with the product's current buying price and the
    /// margin per line, newest first.
    ///
    /// `profit = (frozen unit price − current purchase price) × quantity`.
    pub async fn list(&self) -> DbResult<Vec<SaleListRow>> {
        let rows = sqlx::query_as::<_, SaleListRow>(
            r#"
            SELECT s.id, s.product_name, s.quantity, s.unit_price_cents,
                   s.total_cents, p.purchase_price_cents,
                   (s.unit_price_cents - p.purchase_price_cents) * s.quantity
                       AS profit_cents
            FROM sales s
            INNER JOIN products p ON p.id = s.product_id
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Re-points a sale at a product and quantity.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the sale and the (possibly different) target product
    /// 2. Requires the target's selling price to be set
    /// 3. Moves stock: same product → net delta (guarded when it deepens
    ///    the decrement); different product → restore the old product in
    ///    full, take the new quantity from the new product guarded
    /// 4. Re-snapshots name and unit price from the target product and
    ///    recomputes the total at its current selling price
    pub async fn update(&self, id: &str, product_id: &str, quantity: i64) -> DbResult<Sale> {
        debug!(id = %id, product_id = %product_id, quantity = %quantity, "Updating sale");

        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, product_name, quantity, unit_price_cents,
                   total_cents, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))?;

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

        if !product.has_selling_price() {
            return Err(DbError::SellingPriceNotSet { name: product.name });
        }

        if sale.product_id == product.id {
            let delta = quantity - sale.quantity;
            if delta > 0 {
                stock::deduct_guarded(&mut tx, &product.id, delta).await?;
            } else if delta < 0 {
                stock::apply_delta(&mut tx, &product.id, -delta).await?;
            }
        } else {
            stock::apply_delta(&mut tx, &sale.product_id, sale.quantity).await?;
            stock::deduct_guarded(&mut tx, &product.id, quantity).await?;
        }

        let now = Utc::now();
        let unit_price = product.selling_price();
        let updated = Sale {
            id: sale.id,
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price_cents: unit_price.cents(),
            total_cents: unit_price.multiply_quantity(quantity).cents(),
            created_at: sale.created_at,
            updated_at: now,
        };

        sqlx::query(
            r#"
            UPDATE sales
            SET product_id = ?2, product_name = ?3, quantity = ?4,
                unit_price_cents = ?5, total_cents = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&updated.id)
        .bind(&updated.product_id)
        .bind(&updated.product_name)
        .bind(updated.quantity)
        .bind(updated.unit_price_cents)
        .bind(updated.total_cents)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Deletes a sale and restores its stock movement.
    ///
    /// ## What This Does (one transaction)
    /// 1. Loads the sale (missing → NotFound)
    /// 2. Reverses each of its sales returns (−return quantity each)
    /// 3. Deletes the sale; the FK cascade removes the returns
    /// 4. Restores the sold quantity to stock
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let sale: Option<(String, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM sales WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, quantity) = sale.ok_or_else(|| DbError::not_found("Sale", id))?;

        let returns: Vec<(String, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM sales_returns WHERE sale_id = ?1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        for (return_product_id, return_quantity) in &returns {
            stock::apply_delta(&mut tx, return_product_id, -return_quantity).await?;
        }

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        stock::apply_delta(&mut tx, &product_id, quantity).await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a receipt number in format: RCPT-YYMMDD-HHMMSS-NNNN
///
/// ## Format
/// - YYMMDD-HHMMSS: UTC timestamp of the checkout
/// - NNNN: millisecond-derived suffix so two receipts in the same second
///   stay distinct
///
/// ## Example
/// `RCPT-240115-103000-0042`
fn generate_receipt_number(now: DateTime<Utc>) -> String {
    let seq = (now.timestamp_millis() % 10000) as u32;
    format!("RCPT-{}-{:04}", now.format("%y%m%d-%H%M%S"), seq)
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

    /// "Rice" bought at 50, sold at 80, with 10 on the shelf.
    async fn stocked_product(db: &Database) -> String {
        let product = db.products().create("Rice", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&product.id, 10, 50, 80)
            .await
            .unwrap();
        product.id
    }

    fn line(product_id: &str, quantity: i64) -> SaleItemInput {
        SaleItemInput {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_checkout_books_sale_and_receipt() {
        let db = db().await;
        let product_id = stocked_product(&db).await;

        let receipt = db.sales().create(&[line(&product_id, 4)]).await.unwrap();

        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].product_name, "Rice");
        assert_eq!(receipt.items[0].unit_price_cents, 80);
        assert_eq!(receipt.items[0].line_total_cents, 320);
        assert_eq!(receipt.total_cents, 320);

        let product = db.products().get(&product_id).await.unwrap();
        assert_eq!(product.stock, 6);

        let rows = db.sales().list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_cents, 320);
    }

    #[tokio::test]
    async fn test_checkout_multiple_items() {
        let db = db().await;
        let rice = stocked_product(&db).await;
        let oil = db.products().create("Cooking Oil", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&oil.id, 5, 200, 250)
            .await
            .unwrap();

        let receipt = db
            .sales()
            .create(&[line(&rice, 2), line(&oil.id, 1)])
            .await
            .unwrap();

        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.total_cents, 2 * 80 + 250);
        assert_eq!(db.products().get(&rice).await.unwrap().stock, 8);
        assert_eq!(db.products().get(&oil.id).await.unwrap().stock, 4);
        assert_eq!(db.sales().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_oversell_rolls_back_whole_batch() {
        let db = db().await;
        let rice = stocked_product(&db).await;
        let oil = db.products().create("Cooking Oil", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&oil.id, 1, 200, 250)
            .await
            .unwrap();

        // First line would succeed on its own; second line oversells
        let err = db
            .sales()
            .create(&[line(&rice, 2), line(&oil.id, 5)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // Nothing survived the rollback, including the rice decrement
        assert_eq!(db.products().get(&rice).await.unwrap().stock, 10);
        assert_eq!(db.products().get(&oil.id).await.unwrap().stock, 1);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_requires_selling_price() {
        let db = db().await;
        let product = db.products().create("Rice", 10).await.unwrap();

        let err = db.sales().create(&[line(&product.id, 1)]).await.unwrap_err();
        match err {
            DbError::SellingPriceNotSet { name } => assert_eq!(name, "Rice"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_missing_product() {
        let db = db().await;

        let err = db.sales().create(&[line("no-such-id", 1)]).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_computes_profit_against_current_purchase_price() {
        let db = db().await;
        let product_id = stocked_product(&db).await;
        db.sales().create(&[line(&product_id, 4)]).await.unwrap();

        let rows = db.sales().list().await.unwrap();
        assert_eq!(rows[0].purchase_price_cents, 50);
        assert_eq!(rows[0].profit_cents, (80 - 50) * 4);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["sellingPricePerUnit"], 80);
        assert_eq!(json["totalAmount"], 320);
        assert_eq!(json["purchasePrice"], 50);
        assert_eq!(json["profit"], 120);
    }

    #[tokio::test]
    async fn test_update_same_product_moves_the_difference() {
        let db = db().await;
        let product_id = stocked_product(&db).await;
        db.sales().create(&[line(&product_id, 4)]).await.unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();

        // 4 → 6 takes two more units
        let updated = db.sales().update(&sale_id, &product_id, 6).await.unwrap();
        assert_eq!(updated.quantity, 6);
        assert_eq!(updated.total_cents, 480);
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 4);

        // 6 → 1 gives five back
        db.sales().update(&sale_id, &product_id, 1).await.unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 9);
    }

    #[tokio::test]
    async fn test_update_increase_is_guarded() {
        let db = db().await;
        let product_id = stocked_product(&db).await;
        db.sales().create(&[line(&product_id, 4)]).await.unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();

        // Only 6 on the shelf; going 4 → 20 needs 16 more
        let err = db
            .sales()
            .update(&sale_id, &product_id, 20)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // Untouched on failure
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 6);
        assert_eq!(db.sales().list().await.unwrap()[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_update_repoints_to_another_product() {
        let db = db().await;
        let rice = stocked_product(&db).await;
        let oil = db.products().create("Cooking Oil", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&oil.id, 5, 200, 250)
            .await
            .unwrap();

        db.sales().create(&[line(&rice, 4)]).await.unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();

        let updated = db.sales().update(&sale_id, &oil.id, 2).await.unwrap();

        // Old product restored in full, new product charged guarded
        assert_eq!(db.products().get(&rice).await.unwrap().stock, 10);
        assert_eq!(db.products().get(&oil.id).await.unwrap().stock, 3);

        // Snapshots now come from the new product at its current price
        assert_eq!(updated.product_name, "Cooking Oil");
        assert_eq!(updated.unit_price_cents, 250);
        assert_eq!(updated.total_cents, 500);
    }

    #[tokio::test]
    async fn test_delete_restores_stock() {
        let db = db().await;
        let product_id = stocked_product(&db).await;
        db.sales().create(&[line(&product_id, 4)]).await.unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();

        db.sales().delete(&sale_id).await.unwrap();

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 10);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reverses_its_returns_first() {
        let db = db().await;
        let product_id = stocked_product(&db).await;
        db.sales().create(&[line(&product_id, 4)]).await.unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();

        // Customer returns 2: stock 6 → 8
        db.sales_returns()
            .create(&sale_id, 2, "Changed their mind")
            .await
            .unwrap();
        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 8);

        // Deleting the sale first undoes the return (−2), then restores
        // the sold quantity (+4): back to the original 10
        db.sales().delete(&sale_id).await.unwrap();

        assert_eq!(db.products().get(&product_id).await.unwrap().stock, 10);
        assert!(db.sales_returns().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_receipt_number_shape() {
        use chrono::TimeZone;

        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let number = generate_receipt_number(now);

        assert!(number.starts_with("RCPT-240115-103000-"));
        assert_eq!(number.len(), "RCPT-240115-103000-0000".len());
        let suffix = number.rsplit('-').next().unwrap();
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
