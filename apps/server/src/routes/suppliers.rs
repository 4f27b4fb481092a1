//! Supplier handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::{validate_address, validate_contact, validate_supplier_name};
use till_core::Supplier;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRequest {
    pub name: String,
    pub contact: String,
    pub address: String,
}

fn validate(body: &SupplierRequest) -> ApiResult<()> {
    validate_supplier_name(&body.name)?;
    validate_contact(&body.contact)?;
    validate_address(&body.address)?;
    Ok(())
}

/// GET /suppliers
pub async fn list_suppliers(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Supplier>>> {
    let suppliers = state.db.suppliers().list().await?;
    Ok(Json(suppliers))
}

/// POST /suppliers
pub async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SupplierRequest>,
) -> ApiResult<Json<Value>> {
    validate(&body)?;

    let supplier = state
        .db
        .suppliers()
        .create(&body.name, &body.contact, &body.address)
        .await?;

    Ok(Json(json!({
        "message": "Supplier added successfully",
        "supplier": supplier,
    })))
}

/// PUT /suppliers/{id}
pub async fn update_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SupplierRequest>,
) -> ApiResult<Json<Value>> {
    validate(&body)?;

    let supplier = state
        .db
        .suppliers()
        .update(&id, &body.name, &body.contact, &body.address)
        .await?;

    Ok(Json(json!({
        "message": "Supplier updated successfully",
        "supplier": supplier,
    })))
}

/// DELETE /suppliers/{id}
///
/// Deletes unconditionally; purchases referencing the supplier go with
/// it through the cascade.
pub async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.suppliers().delete(&id).await?;

    Ok(Json(json!({ "message": "Supplier deleted successfully" })))
}
