//! # Route Registration
//!
//! Builds the axum router for the REST surface.
//!
//! ## Access Gate Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Route Surface                                  │
//! │                                                                         │
//! │  Open (no token)                  Gated (Bearer token required)         │
//! │  ───────────────                  ─────────────────────────────         │
//! │  GET  /health                     POST   /products                      │
//! │  GET  /company                    PUT    /products/{id}                 │
//! │  POST /setup                      DELETE /products/{id}                 │
//! │  POST /login                      PUT    /stock-prices/{id}             │
//! │  GET  /products[/{id}]            POST   /suppliers                     │
//! │  GET  /suppliers                  PUT    /suppliers/{id}                │
//! │  GET  /purchases                  DELETE /suppliers/{id}                │
//! │  GET  /sales                      POST   /purchases                     │
//! │  GET  /sales-returns              DELETE /purchases/{id}                │
//! │  GET  /purchase-returns           POST   /sales                         │
//! │  GET  /reports/*                  PUT    /sales/{id}                    │
//! │  GET  /dashboard                  DELETE /sales/{id}                    │
//! │                                   POST/PUT/DELETE returns routes        │
//! │                                                                         │
//! │  Setup and login stay open: they are how a token is obtained.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod company;
pub mod health;
pub mod products;
pub mod purchase_returns;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod sales_returns;
pub mod suppliers;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::auth::require_auth;
use crate::state::AppState;

/// Builds the application router.
///
/// Reads are open so the frontend can render before login. Every write
/// except setup and login sits behind the bearer-token gate.
pub fn router(state: Arc<AppState>) -> Router {
    let open = Router::new()
        .route("/health", get(health::health))
        .route("/company", get(company::get_company))
        .route("/setup", post(company::setup_company))
        .route("/login", post(company::login))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/suppliers", get(suppliers::list_suppliers))
        .route("/purchases", get(purchases::list_purchases))
        .route("/sales", get(sales::list_sales))
        .route("/sales-returns", get(sales_returns::list_sales_returns))
        .route(
            "/purchase-returns",
            get(purchase_returns::list_purchase_returns),
        )
        .route("/reports/sales", get(reports::sales_report))
        .route("/reports/sales-returns", get(reports::sales_returns_report))
        .route("/reports/purchases", get(reports::purchases_report))
        .route(
            "/reports/purchase-returns",
            get(reports::purchase_returns_report),
        )
        .route("/reports/suppliers", get(reports::suppliers_report))
        .route("/reports/stock-prices", get(reports::stock_prices_report))
        .route("/dashboard", get(reports::dashboard));

    let gated = Router::new()
        .route("/products", post(products::create_product))
        .route(
            "/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/stock-prices/{id}", put(products::update_stock_prices))
        .route("/suppliers", post(suppliers::create_supplier))
        .route(
            "/suppliers/{id}",
            put(suppliers::update_supplier).delete(suppliers::delete_supplier),
        )
        .route("/purchases", post(purchases::create_purchase))
        .route("/purchases/{id}", delete(purchases::delete_purchase))
        .route("/sales", post(sales::create_sale))
        .route(
            "/sales/{id}",
            put(sales::update_sale).delete(sales::delete_sale),
        )
        .route("/sales-returns", post(sales_returns::create_sales_return))
        .route(
            "/sales-returns/{id}",
            put(sales_returns::update_sales_return).delete(sales_returns::delete_sales_return),
        )
        .route(
            "/purchase-returns",
            post(purchase_returns::create_purchase_return),
        )
        .route(
            "/purchase-returns/{id}",
            put(purchase_returns::update_purchase_return)
                .delete(purchase_returns::delete_purchase_return),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    open.merge(gated).with_state(state)
}
