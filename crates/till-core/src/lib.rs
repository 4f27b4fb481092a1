//! # till-core: Pure Business Logic for Till POS
//!
//! This crate is the **heart** of Till POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (SPA)                              │   │
//! │  │    Catalog UI ──► Sales UI ──► Returns UI ──► Dashboard UI     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 REST Handlers (apps/server)                     │   │
//! │  │    create_sale, add_purchase, process_return, reports, etc.    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ till-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ reporting │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  filters  │  │   rules   │  │   │
//! │  │   │   Sale    │  │  receipts │  │  windows  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Supplier, Purchase, Sale, returns)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Input validation error types
//! - [`validation`] - Field-level validation rules
//! - [`reporting`] - Report filter parsing and time-window math
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic, same input = same output
//! 2. **No I/O**: Database, network and file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod reporting;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use reporting::ReportFilter;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length for product, supplier and company names.
///
/// ## Business Reason
/// Names are displayed on receipts and report rows; anything longer than
/// this is almost certainly pasted garbage rather than a real name.
pub const MAX_NAME_LEN: usize = 255;

/// Minimum length for a supplier name.
pub const MIN_SUPPLIER_NAME_LEN: usize = 3;

/// Supplier address length bounds.
///
/// ## Business Reason
/// An address shorter than this cannot identify a delivery location, and
/// purchase orders are mailed against it.
pub const MIN_ADDRESS_LEN: usize = 10;
pub const MAX_ADDRESS_LEN: usize = 255;

/// Return reason length bounds (purchase returns).
///
/// ## Business Reason
/// Refunds claimed from suppliers need an auditable justification, so a
/// bare "x" is rejected while a short phrase passes.
pub const MIN_REASON_LEN: usize = 3;
pub const MAX_REASON_LEN: usize = 255;
