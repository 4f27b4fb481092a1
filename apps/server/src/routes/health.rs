//! Health check handler.

use axum::Json;
use serde_json::{json, Value};

/// GET /health
///
/// Liveness probe for deployment tooling and the frontend splash screen.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
