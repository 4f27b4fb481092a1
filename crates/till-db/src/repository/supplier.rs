//! # Supplier Repository
//!
//! Database operations for the supplier directory.
//!
//! Deleting a supplier is deliberately unguarded: the FK cascade removes
//! the supplier's purchases and, through them, their purchase returns.
//! Stock is not adjusted by the cascade. This asymmetry with the guarded
//! product delete is part of the existing frontend contract.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::Supplier;

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact, address, created_at, updated_at
            FROM suppliers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by its ID.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No supplier with this ID
    pub async fn get(&self, id: &str) -> DbResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact, address, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        supplier.ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Inserts a new supplier.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn create(&self, name: &str, contact: &str, address: &str) -> DbResult<Supplier> {
        debug!(name = %name, "Inserting supplier");

        let now = Utc::now();
        let supplier = Supplier {
            id: generate_supplier_id(),
            name: name.to_string(),
            contact: contact.to_string(),
            address: address.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, contact, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.address)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("supplier name", name),
            other => other,
        })?;

        Ok(supplier)
    }

    /// Updates a supplier's details.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Supplier doesn't exist
    /// * `Err(DbError::UniqueViolation)` - New name already taken
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        contact: &str,
        address: &str,
    ) -> DbResult<Supplier> {
        debug!(id = %id, "Updating supplier");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = ?2, contact = ?3, address = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(contact)
        .bind(address)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("supplier name", name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        self.get(id).await
    }

    /// Deletes a supplier.
    ///
    /// The FK cascade removes the supplier's purchases and their purchase
    /// returns. Stock stays as it is.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Supplier doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}

/// Helper to generate a new supplier ID.
pub fn generate_supplier_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
