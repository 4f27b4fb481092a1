//! Product catalog handlers.
//!
//! Products are created with name and opening stock only; both prices
//! default to zero and are set later through `PUT /stock-prices/{id}`.
//! The split mirrors how stock actually arrives: the shelf is counted
//! before the bookkeeper knows what the units cost.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::{validate_price_cents, validate_product_name, validate_stock};
use till_core::Product;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPricesRequest {
    pub stock: i64,
    pub purchase_price: i64,
    pub selling_price: i64,
}

/// GET /products
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state.db.products().get(&id).await?;
    Ok(Json(product))
}

/// POST /products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProductRequest>,
) -> ApiResult<Json<Value>> {
    validate_product_name(&body.name)?;
    validate_stock(body.stock)?;

    let product = state.db.products().create(&body.name, body.stock).await?;

    Ok(Json(json!({
        "message": "Product added successfully",
        "product": product,
    })))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ProductRequest>,
) -> ApiResult<Json<Value>> {
    validate_product_name(&body.name)?;
    validate_stock(body.stock)?;

    let product = state
        .db
        .products()
        .update(&id, &body.name, body.stock)
        .await?;

    Ok(Json(json!({
        "message": "Product updated successfully",
        "product": product,
    })))
}

/// PUT /stock-prices/{id}
///
/// Prices arrive in cents and must be non-negative; a selling price of
/// zero keeps the product unsellable.
pub async fn update_stock_prices(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<StockPricesRequest>,
) -> ApiResult<Json<Value>> {
    validate_stock(body.stock)?;
    validate_price_cents(body.purchase_price)?;
    validate_price_cents(body.selling_price)?;

    let product = state
        .db
        .products()
        .set_stock_and_prices(&id, body.stock, body.purchase_price, body.selling_price)
        .await?;

    Ok(Json(json!({
        "message": "Stock and prices updated successfully",
        "product": product,
    })))
}

/// DELETE /products/{id}
///
/// Refused with the referencing rows when any transaction still points
/// at the product.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.products().delete(&id).await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
