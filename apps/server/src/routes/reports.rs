//! Report and dashboard handlers.
//!
//! Every report accepts an optional `?filter=` query parameter
//! (`daily`, `weekly`, `monthly`, `yearly`), defaulting to all records.
//! Unknown filter values fall back to all records rather than erroring,
//! matching how the frontend populates its filter dropdown.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use till_core::{ReportFilter, Supplier};
use till_db::repository::reports::{
    DashboardSummary, PurchaseReturnsReportRow, PurchasesReportRow, SalesReportRow,
    SalesReturnsReportRow, StockPricesRow,
};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub filter: Option<String>,
}

impl ReportQuery {
    fn report_filter(&self) -> ReportFilter {
        self.filter
            .as_deref()
            .map(ReportFilter::parse)
            .unwrap_or_default()
    }
}

/// GET /reports/sales
pub async fn sales_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<SalesReportRow>>> {
    let rows = state.db.reports().sales(query.report_filter()).await?;
    Ok(Json(rows))
}

/// GET /reports/sales-returns
pub async fn sales_returns_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<SalesReturnsReportRow>>> {
    let rows = state
        .db
        .reports()
        .sales_returns(query.report_filter())
        .await?;
    Ok(Json(rows))
}

/// GET /reports/purchases
pub async fn purchases_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<PurchasesReportRow>>> {
    let rows = state.db.reports().purchases(query.report_filter()).await?;
    Ok(Json(rows))
}

/// GET /reports/purchase-returns
pub async fn purchase_returns_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<PurchaseReturnsReportRow>>> {
    let rows = state
        .db
        .reports()
        .purchase_returns(query.report_filter())
        .await?;
    Ok(Json(rows))
}

/// GET /reports/suppliers
pub async fn suppliers_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<Supplier>>> {
    let rows = state.db.reports().suppliers(query.report_filter()).await?;
    Ok(Json(rows))
}

/// GET /reports/stock-prices
///
/// Point-in-time shelf snapshot; a time filter would be meaningless
/// here, so none is read.
pub async fn stock_prices_report(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<StockPricesRow>>> {
    let rows = state.db.reports().stock_prices().await?;
    Ok(Json(rows))
}

/// GET /dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardSummary>> {
    let summary = state.db.reports().dashboard().await?;
    Ok(Json(summary))
}
