//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD with a unique display name
//! - Direct stock/price overwrite for the stock manager screen
//! - Guarded delete
//!
//! ## Guarded Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Why Product Delete Is Guarded                          │
//! │                                                                         │
//! │  DELETE /products/{id}                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Any sale / return / purchase referencing the product?                 │
//! │       │                                                                 │
//! │       ├── YES → refuse, return every referencing row per table         │
//! │       │         (the FKs cascade; an unguarded delete would silently   │
//! │       │          erase transaction history)                            │
//! │       │                                                                 │
//! │       └── NO  → delete the row                                         │
//! │                                                                         │
//! │  Suppliers are deliberately NOT guarded this way: deleting a supplier  │
//! │  cascades through its purchases. The asymmetry is part of the          │
//! │  existing frontend contract.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::{Product, Purchase, PurchaseReturn, RelatedRecords, Sale, SalesReturn};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.create("Rice", 0).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, purchase_price_cents, selling_price_cents, stock,
                   created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No product with this ID
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, purchase_price_cents, selling_price_cents, stock,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Inserts a new product.
    ///
    /// Prices start at zero and are entered later through
    /// [`set_stock_and_prices`](Self::set_stock_and_prices); the sale path
    /// refuses products whose selling price is still zero.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn create(&self, name: &str, stock: i64) -> DbResult<Product> {
        debug!(name = %name, "Inserting product");

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: name.to_string(),
            purchase_price_cents: 0,
            selling_price_cents: 0,
            stock,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, purchase_price_cents, selling_price_cents, stock,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.purchase_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("product name", name),
            other => other,
        })?;

        Ok(product)
    }

    /// Updates a product's name and stock.
    ///
    /// This is the rename / manual stock overwrite path; prices are changed
    /// through [`set_stock_and_prices`](Self::set_stock_and_prices).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::UniqueViolation)` - New name already taken
    pub async fn update(&self, id: &str, name: &str, stock: i64) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, stock = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("product name", name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Overwrites stock and both prices in one step.
    ///
    /// Used by the stock manager screen. The values replace whatever is
    /// stored; there is no reconciliation against movement history.
    pub async fn set_stock_and_prices(
        &self,
        id: &str,
        stock: i64,
        purchase_price_cents: i64,
        selling_price_cents: i64,
    ) -> DbResult<Product> {
        debug!(id = %id, stock = %stock, "Setting stock and prices");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = ?2, purchase_price_cents = ?3, selling_price_cents = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(stock)
        .bind(purchase_price_cents)
        .bind(selling_price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Deletes a product if nothing references it.
    ///
    /// ## What This Does
    /// 1. Confirms the product exists (missing → NotFound)
    /// 2. Collects every sale, sales return, purchase and purchase return
    ///    referencing it
    /// 3. Refuses with [`DbError::ProductInUse`] carrying those rows, or
    ///    deletes the product when there are none
    ///
    /// The check and the delete share one transaction so a concurrent
    /// insert cannot slip a row in between them and get cascaded away.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let mut tx = self.pool.begin().await?;

        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Product", id));
        }

        let related = related_records(&mut tx, id).await?;
        if !related.is_empty() {
            return Err(DbError::ProductInUse { related });
        }

        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Collects every transactional row referencing a product, per table.
async fn related_records(
    conn: &mut SqliteConnection,
    product_id: &str,
) -> DbResult<RelatedRecords> {
    let sales = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, product_id, product_name, quantity, unit_price_cents,
               total_cents, created_at, updated_at
        FROM sales
        WHERE product_id = ?1
        ORDER BY created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    let sales_returns = sqlx::query_as::<_, SalesReturn>(
        r#"
        SELECT id, sale_id, product_id, product_name, quantity, refund_cents,
               reason, created_at, updated_at
        FROM sales_returns
        WHERE product_id = ?1
        ORDER BY created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    let purchases = sqlx::query_as::<_, Purchase>(
        r#"
        SELECT id, product_id, supplier_id, product_name, quantity,
               unit_price_cents, total_cents, created_at, updated_at
        FROM purchases
        WHERE product_id = ?1
        ORDER BY created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    let purchase_returns = sqlx::query_as::<_, PurchaseReturn>(
        r#"
        SELECT id, purchase_id, product_id, product_name, quantity,
               refund_cents, reason, created_at, updated_at
        FROM purchase_returns
        WHERE product_id = ?1
        ORDER BY created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(RelatedRecords {
        sales,
        sales_returns,
        purchases,
        purchase_returns,
    })
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
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

    #[tokio::test]
    async fn test_create_defaults_prices_to_zero() {
        let db = db().await;

        let product = db.products().create("Rice", 10).await.unwrap();

        assert_eq!(product.name, "Rice");
        assert_eq!(product.stock, 10);
        assert_eq!(product.purchase_price_cents, 0);
        assert_eq!(product.selling_price_cents, 0);
        assert!(!product.has_selling_price());

        // Round-trip through the database
        let loaded = db.products().get(&product.id).await.unwrap();
        assert_eq!(loaded.name, "Rice");
        assert_eq!(loaded.stock, 10);
    }

    #[tokio::test]
    async fn test_duplicate_name_refused() {
        let db = db().await;
        db.products().create("Rice", 0).await.unwrap();

        let err = db.products().create("Rice", 5).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "product name");
                assert_eq!(value, "Rice");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_update_renames_and_overwrites_stock() {
        let db = db().await;
        let product = db.products().create("Rce", 3).await.unwrap();

        let updated = db.products().update(&product.id, "Rice", 7).await.unwrap();

        assert_eq!(updated.name, "Rice");
        assert_eq!(updated.stock, 7);
        assert!(updated.updated_at >= product.updated_at);
    }

    #[tokio::test]
    async fn test_set_stock_and_prices() {
        let db = db().await;
        let product = db.products().create("Rice", 0).await.unwrap();

        let updated = db
            .products()
            .set_stock_and_prices(&product.id, 20, 50, 80)
            .await
            .unwrap();

        assert_eq!(updated.stock, 20);
        assert_eq!(updated.purchase_price_cents, 50);
        assert_eq!(updated.selling_price_cents, 80);
        assert!(updated.has_selling_price());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = db().await;

        let err = db.products().get("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product() {
        let db = db().await;
        let product = db.products().create("Rice", 0).await.unwrap();

        db.products().delete(&product.id).await.unwrap();

        let err = db.products().get(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_referenced_product_refused_with_payload() {
        let db = db().await;
        let product = db.products().create("Rice", 0).await.unwrap();
        db.products()
            .set_stock_and_prices(&product.id, 0, 50, 80)
            .await
            .unwrap();
        let supplier = db
            .suppliers()
            .create("Golden Grain Co", "03001234567", "14 Harbour Road, Karachi")
            .await
            .unwrap();
        db.purchases()
            .create(&product.id, &supplier.id, 10)
            .await
            .unwrap();

        let err = db.products().delete(&product.id).await.unwrap_err();
        match err {
            DbError::ProductInUse { related } => {
                assert_eq!(related.purchases.len(), 1);
                assert!(related.sales.is_empty());
                assert_eq!(related.purchases[0].product_name, "Rice");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Refusal must not have deleted anything
        db.products().get(&product.id).await.unwrap();
    }
}
