//! Sale handlers.
//!
//! A sale checks out a basket of items in one transaction. Every item
//! must clear the stock guard and carry a selling price, otherwise the
//! whole basket is refused and no stock moves.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::validate_quantity;
use till_db::repository::sale::{SaleItemInput, SaleListRow};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub items: Vec<SaleItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleUpdateRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// GET /sales
///
/// Rows carry the frozen selling price next to the product's current
/// purchase price, so the frontend can show per-line profit.
pub async fn list_sales(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SaleListRow>>> {
    let sales = state.db.sales().list().await?;
    Ok(Json(sales))
}

/// POST /sales
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaleRequest>,
) -> ApiResult<Json<Value>> {
    if body.items.is_empty() {
        return Err(ApiError::BadRequest(
            "No products selected for sale".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(body.items.len());
    for item in &body.items {
        validate_quantity(item.quantity)?;
        items.push(SaleItemInput {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        });
    }

    let receipt = state.db.sales().create(&items).await?;

    Ok(Json(json!({
        "message": "Sale recorded successfully",
        "receipt": receipt,
    })))
}

/// PUT /sales/{id}
///
/// Re-points the sale at a product and quantity, adjusting stock by the
/// difference and re-snapshotting name and price from the new product.
pub async fn update_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SaleUpdateRequest>,
) -> ApiResult<Json<Value>> {
    validate_quantity(body.quantity)?;

    let sale = state
        .db
        .sales()
        .update(&id, &body.product_id, body.quantity)
        .await?;

    Ok(Json(json!({
        "message": "Sale updated successfully",
        "sale": sale,
    })))
}

/// DELETE /sales/{id}
///
/// Removes the sale and its returns, restoring stock to where it would
/// be had the sale never happened.
pub async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.sales().delete(&id).await?;

    Ok(Json(json!({ "message": "Sale deleted successfully" })))
}
