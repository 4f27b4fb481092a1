//! # Domain Types
//!
//! Core domain types used throughout Till POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │   Catalog                      Transactions                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Purchase     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  product_id     │   │  product_id     │       │
//! │  │  name (unique)  │   │  supplier_id    │   │  product_name*  │       │
//! │  │  prices (cents) │   │  product_name*  │   │  unit_price*    │       │
//! │  │  stock          │   │  unit_price*    │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │   │  SalesReturn    │   │ PurchaseReturn  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (unique)  │   │  sale_id        │   │  purchase_id    │       │
//! │  │  contact        │   │  refund*        │   │  refund         │       │
//! │  │  address        │   │  reason         │   │  reason         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  * = snapshot taken at write time, never rewritten by catalog edits    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Transactional rows freeze the product name and the unit price (or refund)
//! in effect when the row was written. Renaming a product or changing its
//! prices later must not rewrite receipts, returns or reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// Prices start at zero when the product is created and are set through the
/// stock manager; a sale is refused while the selling price is unset.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the catalog.
    pub name: String,

    /// Buying price in cents; what a purchase books per unit.
    pub purchase_price_cents: i64,

    /// Selling price in cents; what a sale books per unit.
    pub selling_price_cents: i64,

    /// Current stock level. Guarded against oversell on the sale path only;
    /// returns and deletes may drive it negative.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the buying price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Whether the selling price has been set. Products are created with
    /// price 0 and cannot be sold until the price is entered.
    #[inline]
    pub fn has_selling_price(&self) -> bool {
        self.selling_price_cents > 0
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier purchases are booked against.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the directory.
    pub name: String,

    /// Phone number, digits only.
    pub contact: String,

    /// Postal address used on purchase orders.
    pub address: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Purchase
// =============================================================================

/// A stock-in transaction: quantity bought from a supplier.
///
/// `unit_price_cents` snapshots the product's buying price at booking time;
/// `total_cents` is `unit price × quantity` computed once at write time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    pub supplier_id: String,
    /// Product name at booking time (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Buying price per unit at booking time (frozen).
    pub unit_price_cents: i64,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the purchase total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A stock-out transaction: quantity sold to a customer.
///
/// One row per item line. A multi-item checkout writes several rows inside
/// one transaction and answers with a single receipt.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    /// Product name at sale time (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Selling price per unit at sale time (frozen).
    pub unit_price_cents: i64,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sales Return
// =============================================================================

/// Goods coming back from a customer against a recorded sale.
///
/// The refund is always `quantity × sale unit price`, derived from the
/// sale's frozen price, never from client input.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReturn {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name copied from the sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Refund owed to the customer, in cents.
    pub refund_cents: i64,
    pub reason: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SalesReturn {
    /// Returns the refund as Money.
    #[inline]
    pub fn refund(&self) -> Money {
        Money::from_cents(self.refund_cents)
    }
}

// =============================================================================
// Purchase Return
// =============================================================================

/// Goods going back to a supplier against a recorded purchase.
///
/// The refund here is the amount agreed with the supplier and comes from
/// the caller, unlike sales returns where it is derived.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReturn {
    pub id: String,
    pub purchase_id: String,
    pub product_id: String,
    /// Product name copied from the purchase (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Refund claimed from the supplier, in cents.
    pub refund_cents: i64,
    pub reason: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PurchaseReturn {
    /// Returns the refund as Money.
    #[inline]
    pub fn refund(&self) -> Money {
        Money::from_cents(self.refund_cents)
    }
}

// =============================================================================
// Company
// =============================================================================

/// The company this installation belongs to. Exactly one row exists after
/// setup; the access secret is stored only as a hash and never appears on
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Receipt
// =============================================================================

/// One line on a receipt.
///
/// Field names follow the printed receipt contract the frontend renders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub product_name: String,
    pub quantity: i64,
    /// Selling price per unit at sale time, in cents.
    #[serde(rename = "pricePerUnit")]
    pub unit_price_cents: i64,
    /// Line total, in cents.
    #[serde(rename = "total")]
    pub line_total_cents: i64,
}

/// The document returned by a checkout.
///
/// Receipts are computed per call and returned inline; they are never
/// persisted. Re-reading a sale later reconstructs figures from the sale
/// rows, not from a stored receipt.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Unique per call, derived from the timestamp.
    pub receipt_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<ReceiptItem>,
    /// Grand total across all items, in cents.
    #[serde(rename = "totalAmount")]
    pub total_cents: i64,
}

// =============================================================================
// Related Records
// =============================================================================

/// Every transactional row referencing a product, grouped per table.
///
/// Returned as the payload of a refused product delete so the frontend can
/// show the operator exactly what blocks the deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRecords {
    pub sales: Vec<Sale>,
    pub sales_returns: Vec<SalesReturn>,
    pub purchases: Vec<Purchase>,
    pub purchase_returns: Vec<PurchaseReturn>,
}

impl RelatedRecords {
    /// True when no transactional row references the product.
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
            && self.sales_returns.is_empty()
            && self.purchases.is_empty()
            && self.purchase_returns.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(selling_cents: i64) -> Product {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: "p1".to_string(),
            name: "Rice".to_string(),
            purchase_price_cents: 50,
            selling_price_cents: selling_cents,
            stock: 10,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_selling_price_gate() {
        assert!(product(80).has_selling_price());
        assert!(!product(0).has_selling_price());
    }

    #[test]
    fn test_receipt_wire_shape() {
        let receipt = Receipt {
            receipt_number: "RCPT-240115-103000-0042".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            items: vec![ReceiptItem {
                product_name: "Rice".to_string(),
                quantity: 4,
                unit_price_cents: 80,
                line_total_cents: 320,
            }],
            total_cents: 320,
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["receiptNumber"], "RCPT-240115-103000-0042");
        assert_eq!(json["totalAmount"], 320);
        assert_eq!(json["items"][0]["productName"], "Rice");
        assert_eq!(json["items"][0]["pricePerUnit"], 80);
        assert_eq!(json["items"][0]["total"], 320);
    }

    #[test]
    fn test_related_records_empty() {
        let related = RelatedRecords::default();
        assert!(related.is_empty());
    }
}
