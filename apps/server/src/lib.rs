//! # till-server: REST API for Till POS
//!
//! The HTTP layer over [`till_db`]. Handlers validate input with
//! [`till_core`], call one repository method, and shape the JSON the
//! store frontend expects.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Flow                                   │
//! │                                                                         │
//! │  Frontend ──► axum Router ──► require_auth ──► Handler                  │
//! │                  │            (mutations only)    │                     │
//! │                  │                                ├─ validate input     │
//! │                  │                                ├─ repository call    │
//! │                  │                                └─ JSON envelope      │
//! │                  │                                                      │
//! │                  └──► ApiError ──► status code + { "error": ... }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
