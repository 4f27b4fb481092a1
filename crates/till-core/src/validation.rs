//! # Validation Module
//!
//! Field-level validation rules for Till POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (SPA forms)                                         │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: REST handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rule validation                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Transaction engine (till-db)                                 │
//! │  ├── Record-level rules (stock, return caps) inside the transaction    │
//! │  └── NOT NULL / UNIQUE / foreign key constraints                       │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules that need database state (stock levels, return caps against the
//! original row) do NOT live here; they run inside the storage transaction
//! where the state they check cannot change under them.

use crate::error::ValidationError;
use crate::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_REASON_LEN, MIN_ADDRESS_LEN, MIN_REASON_LEN,
    MIN_SUPPLIER_NAME_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 255 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a supplier name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Between 3 and 255 characters
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() < MIN_SUPPLIER_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_SUPPLIER_NAME_LEN,
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a supplier contact number.
///
/// ## Rules
/// - Must not be empty
/// - ASCII digits only (no separators, no country-code plus sign)
pub fn validate_contact(contact: &str) -> ValidationResult<()> {
    let contact = contact.trim();

    if contact.is_empty() {
        return Err(ValidationError::Required {
            field: "contact".to_string(),
        });
    }

    if !contact.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "contact".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a supplier address.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Between 10 and 255 characters
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    if address.len() < MIN_ADDRESS_LEN {
        return Err(ValidationError::TooShort {
            field: "address".to_string(),
            min: MIN_ADDRESS_LEN,
        });
    }

    if address.len() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: MAX_ADDRESS_LEN,
        });
    }

    Ok(())
}

/// Validates a company name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 255 characters
pub fn validate_company_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "companyName".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "companyName".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates the setup secret key.
///
/// ## Rules
/// - Must not be empty. Strength is the operator's call; the key is hashed
///   before storage either way.
pub fn validate_secret_key(secret: &str) -> ValidationResult<()> {
    if secret.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "secretKey".to_string(),
        });
    }

    Ok(())
}

/// Validates a purchase-return reason.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Between 3 and 255 characters (claimed against a supplier, so it must
///   say something)
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() < MIN_REASON_LEN {
        return Err(ValidationError::TooShort {
            field: "reason".to_string(),
            min: MIN_REASON_LEN,
        });
    }

    if reason.len() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }

    Ok(())
}

/// Validates a sales-return reason.
///
/// ## Rules
/// - Must not be empty after trimming. Customer-facing returns keep the
///   looser rule; any stated reason is accepted.
pub fn validate_reason_present(reason: &str) -> ValidationResult<()> {
    if reason.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a transaction quantity.
///
/// ## Rules
/// - Must be positive (> 0). There is no upper cap; bulk purchases are
///   legitimate.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed; it means "not set yet" and blocks sales until priced
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a manual stock level entry.
///
/// ## Rules
/// - Must be non-negative. Negative stock can arise from unguarded return
///   paths, but an operator typing a negative number is a mistake.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a client-supplied refund amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); a refund of nothing is not a return
pub fn validate_refund_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "refundAmount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
