//! Purchase return handlers.
//!
//! The request carries a `productId` for wire compatibility, but the
//! product identity is always taken from the purchase row itself; the
//! field is ignored. Refund amounts are negotiated with the supplier,
//! so unlike sales returns they come from the client.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::{validate_quantity, validate_reason, validate_refund_cents};
use till_db::repository::purchase_return::PurchaseReturnListRow;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReturnRequest {
    pub purchase_id: String,
    pub quantity: i64,
    pub refund_amount: i64,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReturnUpdateRequest {
    pub quantity: i64,
    pub refund_amount: i64,
    pub reason: String,
}

/// GET /purchase-returns
pub async fn list_purchase_returns(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PurchaseReturnListRow>>> {
    let returns = state.db.purchase_returns().list().await?;
    Ok(Json(returns))
}

/// POST /purchase-returns
pub async fn create_purchase_return(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PurchaseReturnRequest>,
) -> ApiResult<Json<Value>> {
    validate_quantity(body.quantity)?;
    validate_refund_cents(body.refund_amount)?;
    validate_reason(&body.reason)?;

    let purchase_return = state
        .db
        .purchase_returns()
        .create(
            &body.purchase_id,
            body.quantity,
            body.refund_amount,
            &body.reason,
        )
        .await?;

    Ok(Json(json!({
        "message": "Purchase return processed successfully",
        "purchaseReturn": purchase_return,
    })))
}

/// PUT /purchase-returns/{id}
pub async fn update_purchase_return(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<PurchaseReturnUpdateRequest>,
) -> ApiResult<Json<Value>> {
    validate_quantity(body.quantity)?;
    validate_refund_cents(body.refund_amount)?;
    validate_reason(&body.reason)?;

    let purchase_return = state
        .db
        .purchase_returns()
        .update(&id, body.quantity, body.refund_amount, &body.reason)
        .await?;

    Ok(Json(json!({
        "message": "Purchase return updated successfully",
        "purchaseReturn": purchase_return,
    })))
}

/// DELETE /purchase-returns/{id}
///
/// Deleting the return puts the returned units back on the shelf.
pub async fn delete_purchase_return(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.purchase_returns().delete(&id).await?;

    Ok(Json(json!({ "message": "Purchase return deleted successfully" })))
}
