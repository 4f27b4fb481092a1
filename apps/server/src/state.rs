//! Shared application state.

use till_db::Database;

use crate::auth::JwtManager;
use crate::config::ServerConfig;

/// State shared by every request handler.
///
/// Wrapped in an `Arc` by the router so handlers and middleware share
/// one pool and one token manager.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ServerConfig,
}

impl AppState {
    /// Builds the shared state from a connected database and config.
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        AppState { db, jwt, config }
    }
}
