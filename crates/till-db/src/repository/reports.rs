//! # Report Repository
//!
//! Read-only projections over the transactional tables.
//!
//! ## Query Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Windowed Report Queries                             │
//! │                                                                         │
//! │  GET /reports/sales?filter=weekly                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReportFilter::parse("weekly")                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  window_start(now) ──► Option<DateTime<Utc>>                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE (?1 IS NULL OR created_at >= ?1)                                 │
//! │         └── one SQL shape for every filter; `all` binds NULL            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports read the frozen snapshot columns on the transactional rows, so a
//! later rename or reprice never rewrites history. The single live read is
//! the purchases report joining the supplier name, and the stock-prices
//! report, which is current state by definition.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;
use till_core::{ReportFilter, Supplier};

// =============================================================================
// Row Shapes
// =============================================================================

/// One sale line in the sales report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRow {
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "sellingPrice")]
    pub unit_price_cents: i64,
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
    pub date: DateTime<Utc>,
}

/// One return line in the sales returns report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalesReturnsReportRow {
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "refundAmount")]
    pub refund_cents: i64,
}

/// One purchase line in the purchases report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchasesReportRow {
    pub product_name: String,
    /// Current supplier name; the one live join in reporting.
    pub supplier: String,
    pub quantity: i64,
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
}

/// One return line in the purchase returns report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReturnsReportRow {
    pub product_name: String,
    pub quantity: i64,
    pub reason: String,
}

/// Current shelf state of one product in the stock-prices report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockPricesRow {
    pub product_name: String,
    pub stock: i64,
    #[serde(rename = "purchasePrice")]
    pub purchase_price_cents: i64,
    #[serde(rename = "sellingPrice")]
    pub selling_price_cents: i64,
}

/// One calendar day of sales revenue.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySales {
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
    /// Total sale amount for the day, in cents.
    pub sales: i64,
}

/// One calendar day of purchase spend.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyPurchases {
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
    /// Total purchase amount for the day, in cents.
    pub purchases: i64,
}

/// Lifetime figures and per-day series for the dashboard.
///
/// Key spelling follows the frontend contract, including `purchasesReturns`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: i64,
    pub total_purchases: i64,
    pub sales_returns: i64,
    pub purchases_returns: i64,
    pub sales_by_date: Vec<DailySales>,
    pub purchases_by_date: Vec<DailyPurchases>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for report queries. Read-only; never writes.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sales within the filter window, newest first.
    pub async fn sales(&self, filter: ReportFilter) -> DbResult<Vec<SalesReportRow>> {
        let since = filter.window_start(Utc::now());

        let rows = sqlx::query_as::<_, SalesReportRow>(
            r#"
            SELECT product_name, quantity, unit_price_cents, total_cents,
                   created_at AS date
            FROM sales
            WHERE (?1 IS NULL OR created_at >= ?1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Sales returns within the filter window, newest first.
    pub async fn sales_returns(
        &self,
        filter: ReportFilter,
    ) -> DbResult<Vec<SalesReturnsReportRow>> {
        let since = filter.window_start(Utc::now());

        let rows = sqlx::query_as::<_, SalesReturnsReportRow>(
            r#"
            SELECT product_name, quantity, refund_cents
            FROM sales_returns
            WHERE (?1 IS NULL OR created_at >= ?1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Purchases within the filter window, newest first, with the supplier's
    /// current name joined in.
    pub async fn purchases(&self, filter: ReportFilter) -> DbResult<Vec<PurchasesReportRow>> {
        let since = filter.window_start(Utc::now());

        let rows = sqlx::query_as::<_, PurchasesReportRow>(
            r#"
            SELECT p.product_name, s.name AS supplier, p.quantity, p.total_cents
            FROM purchases p
            INNER JOIN suppliers s ON s.id = p.supplier_id
            WHERE (?1 IS NULL OR p.created_at >= ?1)
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Purchase returns within the filter window, newest first.
    pub async fn purchase_returns(
        &self,
        filter: ReportFilter,
    ) -> DbResult<Vec<PurchaseReturnsReportRow>> {
        let since = filter.window_start(Utc::now());

        let rows = sqlx::query_as::<_, PurchaseReturnsReportRow>(
            r#"
            SELECT product_name, quantity, reason
            FROM purchase_returns
            WHERE (?1 IS NULL OR created_at >= ?1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Suppliers whose directory entry was created within the filter window.
    pub async fn suppliers(&self, filter: ReportFilter) -> DbResult<Vec<Supplier>> {
        let since = filter.window_start(Utc::now());

        let rows = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact, address, created_at, updated_at
            FROM suppliers
            WHERE (?1 IS NULL OR created_at >= ?1)
            ORDER BY name
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Current stock and prices for every product. Always current state;
    /// there is no window to apply.
    pub async fn stock_prices(&self) -> DbResult<Vec<StockPricesRow>> {
        let rows = sqlx::query_as::<_, StockPricesRow>(
            r#"
            SELECT name AS product_name, stock, purchase_price_cents,
                   selling_price_cents
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lifetime sums and per-day revenue/spend series.
    ///
    /// Sums cover all history; empty tables report 0, not NULL. The series
    /// group by calendar day of `created_at`, ascending.
    pub async fn dashboard(&self) -> DbResult<DashboardSummary> {
        let (total_sales,): (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(total_cents), 0) FROM sales")
                .fetch_one(&self.pool)
                .await?;

        let (total_purchases,): (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(total_cents), 0) FROM purchases")
                .fetch_one(&self.pool)
                .await?;

        let (sales_returns,): (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(refund_cents), 0) FROM sales_returns")
                .fetch_one(&self.pool)
                .await?;

        let (purchases_returns,): (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(refund_cents), 0) FROM purchase_returns")
                .fetch_one(&self.pool)
                .await?;

        let sales_by_date = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT date(created_at) AS date, SUM(total_cents) AS sales
            FROM sales
            GROUP BY date(created_at)
            ORDER BY date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let purchases_by_date = sqlx::query_as::<_, DailyPurchases>(
            r#"
            SELECT date(created_at) AS date, SUM(total_cents) AS purchases
            FROM purchases
            GROUP BY date(created_at)
            ORDER BY date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardSummary {
            total_sales,
            total_purchases,
            sales_returns,
            purchases_returns,
            sales_by_date,
            purchases_by_date,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::sale::SaleItemInput;
    use chrono::Duration;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds one of everything:
    /// purchase 10 × Rice @ 50 (500), sale 4 @ 80 (320),
    /// sales return 1 (refund 80), purchase return 1 (refund 50).
    async fn seeded(db: &Database) -> String {
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
        db.sales()
            .create(&[SaleItemInput {
                product_id: product.id.clone(),
                quantity: 4,
            }])
            .await
            .unwrap();
        let sale_id = db.sales().list().await.unwrap()[0].id.clone();
        db.sales_returns()
            .create(&sale_id, 1, "Changed their mind")
            .await
            .unwrap();
        db.purchase_returns()
            .create(&purchase.id, 1, 50, "Damaged in transit")
            .await
            .unwrap();
        product.id
    }

    /// Writes a sale row dated `days_ago` in the past, bypassing the
    /// repository so the timestamp can be controlled.
    async fn backdated_sale(db: &Database, product_id: &str, days_ago: i64) {
        let then = Utc::now() - Duration::days(days_ago);
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, product_name, quantity, unit_price_cents,
                total_cents, created_at, updated_at
            ) VALUES (?1, ?2, 'Rice', 1, 80, 80, ?3, ?3)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(product_id)
        .bind(then)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_sales_report_shape() {
        let db = db().await;
        seeded(&db).await;

        let rows = db.reports().sales(ReportFilter::All).await.unwrap();
        assert_eq!(rows.len(), 1);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["quantity"], 4);
        assert_eq!(json["sellingPrice"], 80);
        assert_eq!(json["totalAmount"], 320);
        assert!(json["date"].is_string());
    }

    #[tokio::test]
    async fn test_window_excludes_old_rows() {
        let db = db().await;
        let product_id = seeded(&db).await;
        backdated_sale(&db, &product_id, 400).await;

        // A 400-day-old sale falls outside every bounded window
        assert_eq!(db.reports().sales(ReportFilter::All).await.unwrap().len(), 2);
        assert_eq!(
            db.reports().sales(ReportFilter::Daily).await.unwrap().len(),
            1
        );
        assert_eq!(
            db.reports().sales(ReportFilter::Weekly).await.unwrap().len(),
            1
        );
        assert_eq!(
            db.reports().sales(ReportFilter::Yearly).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_purchases_report_joins_supplier_name() {
        let db = db().await;
        seeded(&db).await;

        let rows = db.reports().purchases(ReportFilter::All).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].supplier, "Acme Traders");
        assert_eq!(rows[0].total_cents, 500);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["supplier"], "Acme Traders");
        assert_eq!(json["totalAmount"], 500);
    }

    #[tokio::test]
    async fn test_returns_reports_shapes() {
        let db = db().await;
        seeded(&db).await;

        let sales_returns = db
            .reports()
            .sales_returns(ReportFilter::All)
            .await
            .unwrap();
        assert_eq!(sales_returns.len(), 1);
        let json = serde_json::to_value(&sales_returns[0]).unwrap();
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["refundAmount"], 80);

        let purchase_returns = db
            .reports()
            .purchase_returns(ReportFilter::All)
            .await
            .unwrap();
        assert_eq!(purchase_returns.len(), 1);
        let json = serde_json::to_value(&purchase_returns[0]).unwrap();
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["reason"], "Damaged in transit");
    }

    #[tokio::test]
    async fn test_suppliers_report_windowed_by_creation() {
        let db = db().await;
        seeded(&db).await;

        // Backdate a second supplier past every bounded window
        let then = Utc::now() - Duration::days(400);
        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, contact, address, created_at, updated_at)
            VALUES (?1, 'Old Mill Co', '0799999999', '99 Harbour Road, Dockside', ?2, ?2)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(then)
        .execute(db.pool())
        .await
        .unwrap();

        assert_eq!(
            db.reports()
                .suppliers(ReportFilter::All)
                .await
                .unwrap()
                .len(),
            2
        );
        let recent = db.reports().suppliers(ReportFilter::Daily).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "Acme Traders");
    }

    #[tokio::test]
    async fn test_stock_prices_reads_current_state() {
        let db = db().await;
        seeded(&db).await;

        // Stock after seed: +10 purchase, −4 sale, +1 sales return,
        // −1 purchase return
        let rows = db.reports().stock_prices().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock, 6);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["productName"], "Rice");
        assert_eq!(json["purchasePrice"], 50);
        assert_eq!(json["sellingPrice"], 80);
    }

    #[tokio::test]
    async fn test_dashboard_sums_and_series() {
        let db = db().await;
        seeded(&db).await;

        let summary = db.reports().dashboard().await.unwrap();
        assert_eq!(summary.total_sales, 320);
        assert_eq!(summary.total_purchases, 500);
        assert_eq!(summary.sales_returns, 80);
        assert_eq!(summary.purchases_returns, 50);

        assert_eq!(summary.sales_by_date.len(), 1);
        assert_eq!(summary.sales_by_date[0].sales, 320);
        assert_eq!(summary.purchases_by_date.len(), 1);
        assert_eq!(summary.purchases_by_date[0].purchases, 500);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalSales"], 320);
        assert_eq!(json["purchasesReturns"], 50);
        assert!(json["salesByDate"][0]["date"].is_string());
    }

    #[tokio::test]
    async fn test_dashboard_on_empty_database() {
        let db = db().await;

        let summary = db.reports().dashboard().await.unwrap();
        assert_eq!(summary.total_sales, 0);
        assert_eq!(summary.total_purchases, 0);
        assert_eq!(summary.sales_returns, 0);
        assert_eq!(summary.purchases_returns, 0);
        assert!(summary.sales_by_date.is_empty());
        assert!(summary.purchases_by_date.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_groups_by_calendar_day() {
        let db = db().await;
        let product_id = seeded(&db).await;
        backdated_sale(&db, &product_id, 3).await;

        let summary = db.reports().dashboard().await.unwrap();
        assert_eq!(summary.sales_by_date.len(), 2);
        // Ascending by day: the backdated row comes first
        assert_eq!(summary.sales_by_date[0].sales, 80);
        assert_eq!(summary.sales_by_date[1].sales, 320);
        assert!(summary.sales_by_date[0].date < summary.sales_by_date[1].date);
    }
}
