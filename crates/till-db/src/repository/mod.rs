//! # Repository Module
//!
//! Database repository implementations for Till POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  REST handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().create(&items)                                     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create(&self, items)      ← one transaction, all-or-nothing       │
//! │  ├── list(&self)                                                       │
//! │  ├── update(&self, id, ...)                                            │
//! │  └── delete(&self, id)         ← reverses the stock movement           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database)                                   │
//! │  • SQL is isolated in one place                                        │
//! │  • Stock movement goes through one choke point (stock module)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog CRUD with the guarded delete
//! - [`SupplierRepository`] - Supplier directory
//! - [`PurchaseRepository`] - Stock-in transactions
//! - [`SaleRepository`] - Stock-out transactions and receipts
//! - [`SalesReturnRepository`] - Customer returns
//! - [`PurchaseReturnRepository`] - Supplier returns
//! - [`CompanyRepository`] - Setup-once company row and secret verification
//! - [`ReportRepository`] - Windowed read models and the dashboard
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`SupplierRepository`]: supplier::SupplierRepository
//! [`PurchaseRepository`]: purchase::PurchaseRepository
//! [`SaleRepository`]: sale::SaleRepository
//! [`SalesReturnRepository`]: sales_return::SalesReturnRepository
//! [`PurchaseReturnRepository`]: purchase_return::PurchaseReturnRepository
//! [`CompanyRepository`]: company::CompanyRepository
//! [`ReportRepository`]: reports::ReportRepository

pub mod company;
pub mod product;
pub mod purchase;
pub mod purchase_return;
pub mod reports;
pub mod sale;
pub mod sales_return;
pub(crate) mod stock;
pub mod supplier;
