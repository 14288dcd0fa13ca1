//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::auth::{CredentialHasher, TokenKeys};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Everything in here is read-only after
/// startup; the database is the only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    keys: TokenKeys,
    hasher: CredentialHasher,
}

impl AppState {
    /// Build the state, deriving token keys from the configured secret.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let keys = TokenKeys::new(&config.auth.jwt_secret, config.auth.token_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                keys,
                hasher: CredentialHasher::new(),
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Bearer token signing and verification keys.
    #[must_use]
    pub fn keys(&self) -> &TokenKeys {
        &self.inner.keys
    }

    /// Password hasher.
    #[must_use]
    pub fn hasher(&self) -> &CredentialHasher {
        &self.inner.hasher
    }
}
