//! JWT authentication module.
//!
//! Handles token generation, validation, and the middleware that gates
//! mutating routes. One secret, one token type: the server is
//! single-tenant, so a token proves nothing more than a successful
//! login with the company secret.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (company_id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a token for a successful login.
    pub fn generate_token(&self, company_id: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: company_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    if auth_header.starts_with("Bearer ") {
        Some(&auth_header[7..])
    } else {
        None
    }
}

/// Middleware guarding mutating routes.
///
/// Validates the `Authorization: Bearer <token>` header and injects the
/// decoded [`Claims`] into request extensions for downstream handlers.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => extract_bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without token on protected route");
            return Err(ApiError::Unauthorized("No token provided".to_string()));
        }
    };

    let claims = state.jwt.validate_token(token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.generate_token("company-001").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "company-001");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Hours in the past, well beyond the validator's default leeway.
        let manager = JwtManager::new("test-secret".to_string(), -7200);

        let token = manager.generate_token("company-001").unwrap();
        let result = manager.validate_token(&token);

        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = JwtManager::new("secret-a".to_string(), 3600);
        let verifier = JwtManager::new("secret-b".to_string(), 3600);

        let token = signer.generate_token("company-001").unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let a = manager.generate_token("company-001").unwrap();
        let b = manager.generate_token("company-001").unwrap();

        // jti differs even when subject and lifetime match
        let claims_a = manager.validate_token(&a).unwrap();
        let claims_b = manager.validate_token(&b).unwrap();
        assert_ne!(claims_a.jti, claims_b.jti);
    }
}
