//! Purchase handlers.
//!
//! A purchase books incoming stock against a supplier at the product's
//! current purchase price. Unit price and product name are snapshotted
//! into the purchase row, so later catalog edits never rewrite history.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::validate_quantity;
use till_db::repository::purchase::PurchaseListRow;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub product_id: String,
    pub supplier_id: String,
    pub quantity: i64,
}

/// GET /purchases
pub async fn list_purchases(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PurchaseListRow>>> {
    let purchases = state.db.purchases().list().await?;
    Ok(Json(purchases))
}

/// POST /purchases
pub async fn create_purchase(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PurchaseRequest>,
) -> ApiResult<Json<Value>> {
    validate_quantity(body.quantity)?;

    let purchase = state
        .db
        .purchases()
        .create(&body.product_id, &body.supplier_id, body.quantity)
        .await?;

    Ok(Json(json!({
        "message": "Purchase added successfully",
        "purchase": purchase,
    })))
}

/// DELETE /purchases/{id}
///
/// Unwinds the booking: returns against the purchase are reversed and
/// the purchased quantity leaves the shelf again.
pub async fn delete_purchase(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.purchases().delete(&id).await?;

    Ok(Json(json!({ "message": "Purchase deleted successfully" })))
}
