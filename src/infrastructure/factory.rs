//! Repository factory for runtime backend selection.
//!
//! Storage is either MongoDB or in-memory; sessions are either Redis or
//! in-memory. The two choices are independent and come from the
//! `storage.mode` and `sessions.mode` configuration keys.
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load(Config::path_from_env())?;
//! let repositories = RepositoryFactory::new(&config).create().await?;
//! ```

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::{
    InMemorySessionStore, InMemoryTaskListRepository, InMemoryTaskRepository,
    InMemoryUserRepository, MongoTaskListRepository, MongoTaskRepository, MongoUserRepository,
    RedisSessionStore, SessionStore, StoreError, TaskListRepository, TaskRepository,
    UserRepository,
};
use crate::config::{Config, ConfigurationError};

// =============================================================================
// Backend Modes
// =============================================================================

/// Storage mode for users, task lists and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StorageMode {
    /// MongoDB storage for production use.
    #[default]
    MongoDb,
    /// In-memory storage. Suitable for testing and development.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Parses a storage mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

impl TryFrom<String> for StorageMode {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Session store mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SessionMode {
    /// Redis session store for production use.
    #[default]
    Redis,
    /// In-memory session store. Sessions are lost on restart.
    InMemory,
}

impl FromStr for SessionMode {
    type Err = ConfigurationError;

    /// Parses a session mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSessionMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigurationError::InvalidSessionMode(value.to_string())),
        }
    }
}

impl TryFrom<String> for SessionMode {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during factory initialization.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// MongoDB connection error.
    #[error("Database connection error: {0}")]
    DatabaseConnection(StoreError),

    /// Redis connection error.
    #[error("Redis connection error: {0}")]
    RedisConnection(StoreError),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Collection of initialized repositories.
///
/// All repositories are wrapped in `Arc` to allow sharing across threads.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository + Send + Sync>,
    pub task_lists: Arc<dyn TaskListRepository + Send + Sync>,
    pub tasks: Arc<dyn TaskRepository + Send + Sync>,
    pub sessions: Arc<dyn SessionStore + Send + Sync>,
}

impl Repositories {
    /// Creates a fully in-memory set of repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        let (users, task_lists, tasks) = RepositoryFactory::create_in_memory_storage();
        Self {
            users,
            task_lists,
            tasks,
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Repositories")
            .field("users", &"Arc<dyn UserRepository>")
            .field("task_lists", &"Arc<dyn TaskListRepository>")
            .field("tasks", &"Arc<dyn TaskRepository>")
            .field("sessions", &"Arc<dyn SessionStore>")
            .finish()
    }
}

type Storage = (
    Arc<dyn UserRepository + Send + Sync>,
    Arc<dyn TaskListRepository + Send + Sync>,
    Arc<dyn TaskRepository + Send + Sync>,
);

/// Factory for creating repository instances based on configuration.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryFactory<'a> {
    config: &'a Config,
}

impl<'a> RepositoryFactory<'a> {
    /// Creates a new repository factory over the given configuration.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Creates all repositories based on the configuration.
    ///
    /// Connections are verified before returning.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if MongoDB or Redis cannot be reached.
    pub async fn create(&self) -> Result<Repositories, FactoryError> {
        let storage_mode = self.config.storage.mode;
        let session_mode = self.config.sessions.mode;

        let (users, task_lists, tasks) = match storage_mode {
            StorageMode::MongoDb => self.create_mongo_storage().await?,
            StorageMode::InMemory => Self::create_in_memory_storage(),
        };

        let sessions: Arc<dyn SessionStore + Send + Sync> = match session_mode {
            SessionMode::Redis => Arc::new(
                RedisSessionStore::connect(&self.config.redis)
                    .await
                    .map_err(FactoryError::RedisConnection)?,
            ),
            SessionMode::InMemory => Arc::new(InMemorySessionStore::new()),
        };

        tracing::info!(?storage_mode, ?session_mode, "Repositories initialized");

        Ok(Repositories {
            users,
            task_lists,
            tasks,
            sessions,
        })
    }

    async fn create_mongo_storage(&self) -> Result<Storage, FactoryError> {
        let database = super::mongo::connect(&self.config.mongodb)
            .await
            .map_err(FactoryError::DatabaseConnection)?;

        Ok((
            Arc::new(MongoUserRepository::new(&database)),
            Arc::new(MongoTaskListRepository::new(&database)),
            Arc::new(MongoTaskRepository::new(&database)),
        ))
    }

    fn create_in_memory_storage() -> Storage {
        (
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTaskListRepository::new()),
            Arc::new(InMemoryTaskRepository::new()),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
