//! Redis session store.
//!
//! Sessions are plain string entries: `session:{token}` -> JSON identity.
//! No expiry is set; an entry lives until logout deletes it.
//!
//! Connections come from a `deadpool-redis` pool.

use deadpool_redis::{Config, Pool, Runtime};
use futures::future::BoxFuture;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::config::RedisConfig;
use crate::infrastructure::{SessionStore, StoreError};

/// Prefix for session keys.
const SESSION_KEY_PREFIX: &str = "session:";

/// Generates a Redis key for a session token.
fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

/// Builds connection settings without going through a URL, so the password
/// is passed verbatim.
fn connection_info(config: &RedisConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: config.db,
            password: (!config.password.is_empty()).then(|| config.password.clone()),
            ..RedisConnectionInfo::default()
        },
    }
}

// =============================================================================
// Redis Session Store
// =============================================================================

/// Redis implementation of `SessionStore`.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    fn with_pool_config(config: &Config) -> Result<Self, StoreError> {
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|error| StoreError::Session(error.to_string()))?;
        Ok(Self { pool })
    }

    /// Creates a session store from configuration and verifies it with a
    /// `PING`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Session` if the pool cannot be created or the
    /// server does not answer.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let store =
            Self::with_pool_config(&Config::from_connection_info(connection_info(config)))?;
        store.ping().await?;

        tracing::info!(host = %config.host, port = config.port, db = config.db, "Connected to Redis");
        Ok(store)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut connection = self
            .pool
            .get()
            .await
            .map_err(|error| StoreError::Session(error.to_string()))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut *connection)
            .await
            .map_err(|error| StoreError::Session(format!("ping failed: {error}")))?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RedisSessionStore")
            .field("pool_status", &self.pool.status())
            .finish()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl SessionStore for RedisSessionStore {
    fn get(&self, token: &str) -> BoxFuture<'static, Result<Option<String>, StoreError>> {
        let pool = self.pool.clone();
        let key = session_key(token);
        Box::pin(async move {
            let mut connection = pool
                .get()
                .await
                .map_err(|error| StoreError::Session(error.to_string()))?;

            let value: Option<String> = connection
                .get(&key)
                .await
                .map_err(|error| StoreError::Session(error.to_string()))?;

            Ok(value)
        })
    }

    fn set(&self, token: &str, value: &str) -> BoxFuture<'static, Result<(), StoreError>> {
        let pool = self.pool.clone();
        let key = session_key(token);
        let value = value.to_string();
        Box::pin(async move {
            let mut connection = pool
                .get()
                .await
                .map_err(|error| StoreError::Session(error.to_string()))?;

            let () = connection
                .set(&key, &value)
                .await
                .map_err(|error| StoreError::Session(error.to_string()))?;

            Ok(())
        })
    }

    fn delete(&self, token: &str) -> BoxFuture<'static, Result<bool, StoreError>> {
        let pool = self.pool.clone();
        let key = session_key(token);
        Box::pin(async move {
            let mut connection = pool
                .get()
                .await
                .map_err(|error| StoreError::Session(error.to_string()))?;

            let removed: i64 = connection
                .del(&key)
                .await
                .map_err(|error| StoreError::Session(error.to_string()))?;

            Ok(removed > 0)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
