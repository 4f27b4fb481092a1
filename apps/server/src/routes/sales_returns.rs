//! Sales return handlers.
//!
//! Refunds are always computed from the sale's frozen selling price,
//! never taken from the request. A client-supplied `refundAmount` on
//! update is accepted for wire compatibility and ignored.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::{validate_quantity, validate_reason_present};
use till_db::repository::sales_return::SalesReturnListRow;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReturnRequest {
    pub sale_id: String,
    pub return_quantity: i64,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReturnUpdateRequest {
    pub quantity: i64,
}

/// GET /sales-returns
pub async fn list_sales_returns(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SalesReturnListRow>>> {
    let returns = state.db.sales_returns().list().await?;
    Ok(Json(returns))
}

/// POST /sales-returns
pub async fn create_sales_return(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SalesReturnRequest>,
) -> ApiResult<Json<Value>> {
    validate_quantity(body.return_quantity)?;
    validate_reason_present(&body.reason)?;

    let sales_return = state
        .db
        .sales_returns()
        .create(&body.sale_id, body.return_quantity, &body.reason)
        .await?;

    Ok(Json(json!({
        "message": "Sales return processed successfully",
        "salesReturn": sales_return,
    })))
}

/// PUT /sales-returns/{id}
pub async fn update_sales_return(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SalesReturnUpdateRequest>,
) -> ApiResult<Json<Value>> {
    validate_quantity(body.quantity)?;

    let sales_return = state.db.sales_returns().update(&id, body.quantity).await?;

    Ok(Json(json!({
        "message": "Sales return updated successfully",
        "salesReturn": sales_return,
    })))
}

/// DELETE /sales-returns/{id}
///
/// Canceling a return takes the returned units off the shelf again.
pub async fn delete_sales_return(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.sales_returns().delete(&id).await?;

    Ok(Json(json!({ "message": "Sales return canceled successfully" })))
}
