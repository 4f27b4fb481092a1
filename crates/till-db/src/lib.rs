//! # till-db: Storage Layer for Till POS
//!
//! This crate provides database access for the Till POS server.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Data Flow                               │
//! │                                                                         │
//! │  REST handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      till-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (sale.rs ...) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ SaleRepo      │    │ ...          │  │   │
//! │  │   │ Management    │    │ ReturnRepos   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./data/till.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale, returns, ...)
//!
//! ## Transaction Rule
//!
//! Every mutation that touches more than one row (insert + stock write,
//! delete + reversal) runs inside a single SQLite transaction. Partial
//! writes never survive an error; the sale path additionally guards the
//! stock decrement at the statement level.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, DbConfig};
//! use till_db::repository::sale::SaleItemInput;
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("data/till.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let products = db.products().list().await?;
//! let receipt = db
//!     .sales()
//!     .create(&[SaleItemInput {
//!         product_id: "product-uuid".to_string(),
//!         quantity: 4,
//!     }])
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::company::CompanyRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::purchase_return::PurchaseReturnRepository;
pub use repository::reports::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::sales_return::SalesReturnRepository;
pub use repository::supplier::SupplierRepository;
