//! # Company Repository
//!
//! Database operations for the single company row and the shared access
//! secret.
//!
//! ## Setup and Login
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Access Secret Lifecycle                            │
//! │                                                                         │
//! │  POST /setup { companyName, secretKey }                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  argon2 hash ──► INSERT company (guarded: refused once a row exists)    │
//! │                                                                         │
//! │  POST /login { secretKey }                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load hash ──► argon2 verify ──► token issued by the server layer       │
//! │                                                                         │
//! │  The plaintext secret is never stored and never leaves this module      │
//! │  after hashing. Company reads expose only id and name.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::Company;

/// Internal row carrying the stored hash. Never leaves this module.
#[derive(Debug, sqlx::FromRow)]
struct CompanyAuthRow {
    id: String,
    name: String,
    secret_key_hash: String,
}

/// Repository for company database operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Returns the company, or None before setup has run.
    pub async fn get(&self) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT id, name FROM company LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    /// Runs the one-time company setup.
    ///
    /// ## What This Does
    /// 1. Refuses if a company row already exists
    /// 2. Hashes the secret with argon2
    /// 3. Inserts the row through a guarded INSERT, so a racing setup
    ///    cannot slip a second row in between the check and the write
    pub async fn setup(&self, name: &str, secret_key: &str) -> DbResult<Company> {
        debug!(name = %name, "Running company setup");

        if self.get().await?.is_some() {
            return Err(DbError::CompanyExists);
        }

        let hash = hash_secret_key(secret_key)?;
        let company = Company {
            id: generate_company_id(),
            name: name.to_string(),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO company (id, name, secret_key_hash)
            SELECT ?1, ?2, ?3
            WHERE NOT EXISTS (SELECT 1 FROM company)
            "#,
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::CompanyExists);
        }

        Ok(company)
    }

    /// Checks a login secret against the stored hash.
    ///
    /// ## Returns
    /// * `Ok(Some(company))` - Secret matches
    /// * `Ok(None)` - No setup has run yet
    /// * `Err(InvalidSecretKey)` - Secret does not match
    pub async fn verify_secret(&self, secret_key: &str) -> DbResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyAuthRow>(
            "SELECT id, name, secret_key_hash FROM company LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if !verify_secret_key(secret_key, &row.secret_key_hash) {
            return Err(DbError::InvalidSecretKey);
        }

        Ok(Some(Company {
            id: row.id,
            name: row.name,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Verify a secret key against its hash.
fn verify_secret_key(secret_key: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(secret_key.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash a secret key for storage.
fn hash_secret_key(secret_key: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(secret_key.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash secret key: {}", e)))?;

    Ok(hash.to_string())
}

/// Helper to generate a new company ID.
pub fn generate_company_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
