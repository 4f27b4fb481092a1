//! Company setup and login handlers.
//!
//! The server is single-tenant: exactly one company row may exist. Setup
//! stores the name and the argon2 hash of the shared secret; login checks
//! the secret and answers with a bearer token for the mutating routes.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use till_core::validation::{validate_company_name, validate_secret_key};
use till_core::Company;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub company_name: String,
    pub secret_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub secret_key: String,
}

/// GET /company
///
/// Answers 404 until setup has run, which is how the frontend decides
/// whether to show the setup screen or the login screen.
pub async fn get_company(State(state): State<Arc<AppState>>) -> ApiResult<Json<Company>> {
    let company = state
        .db
        .company()
        .get()
        .await?
        .ok_or_else(|| ApiError::NotFound("No company setup found.".to_string()))?;

    Ok(Json(company))
}

/// POST /setup
pub async fn setup_company(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetupRequest>,
) -> ApiResult<Json<Value>> {
    validate_company_name(&body.company_name)?;
    validate_secret_key(&body.secret_key)?;

    let company = state
        .db
        .company()
        .setup(&body.company_name, &body.secret_key)
        .await?;

    info!(company = %company.name, "Company setup complete");

    Ok(Json(json!({
        "message": "Company setup successful",
        "company": company,
    })))
}

/// POST /login
///
/// The secret never leaves this handler; only the token does.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let company = state
        .db
        .company()
        .verify_secret(&body.secret_key)
        .await?
        .ok_or_else(|| ApiError::NotFound("No company setup found.".to_string()))?;

    let token = state.jwt.generate_token(&company.id)?;

    info!(company = %company.name, "Login successful");

    Ok(Json(json!({
        "message": "Login successful",
        "company": company,
        "token": token,
    })))
}
