//! Application configuration.
//!
//! Loaded once at startup from a YAML file and passed by reference to the
//! components that need it. The file path comes from `CONFIG_PATH`,
//! defaulting to `config.yaml` in the working directory.
//!
//! # Example
//!
//! ```yaml
//! is_debug: true
//! listen:
//!   type: tcp
//!   bind_ip: 0.0.0.0
//!   port: 3000
//! storage:
//!   mode: mongodb
//! sessions:
//!   mode: redis
//! mongodb:
//!   host: localhost
//!   port: 27017
//!   database: test
//! redis:
//!   host: localhost
//!   port: 6379
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::{SessionMode, StorageMode};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Configuration file used when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {message}")]
    Read { path: String, message: String },

    /// The configuration file is not valid YAML for this shape.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid storage mode value.
    #[error("Invalid storage mode: '{0}'. Expected 'mongodb' or 'in_memory'")]
    InvalidStorageMode(String),

    /// Invalid session mode value.
    #[error("Invalid session mode: '{0}'. Expected 'redis' or 'in_memory'")]
    InvalidSessionMode(String),

    /// A field holds a value outside its allowed range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

// =============================================================================
// Configuration Types
// =============================================================================

/// Listener transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenType {
    /// TCP on `bind_ip:port`.
    #[default]
    Tcp,
    /// Unix domain socket `app.sock` next to the executable.
    Sock,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    #[serde(rename = "type")]
    pub listen_type: ListenType,
    pub bind_ip: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            listen_type: ListenType::Tcp,
            bind_ip: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Persistent storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub mode: StorageMode,
}

/// Session store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub mode: SessionMode,
}

/// MongoDB connection settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Authentication database; empty means `database`.
    #[serde(alias = "authDB")]
    pub auth_db: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            username: String::new(),
            password: String::new(),
            database: "test".to_string(),
            auth_db: String::new(),
        }
    }
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("auth_db", &self.auth_db)
            .finish_non_exhaustive()
    }
}

/// Redis connection settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    #[serde(alias = "DB")]
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
        }
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Blanket per-request deadline.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub is_debug: bool,
    pub listen: ListenConfig,
    pub storage: StorageConfig,
    pub sessions: SessionsConfig,
    pub mongodb: MongoConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Returns the configuration path from `CONFIG_PATH`, or the default.
    #[must_use]
    pub fn path_from_env() -> PathBuf {
        env::var_os(CONFIG_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the file cannot be read, is not valid
    /// YAML for this shape, or holds invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|error| ConfigurationError::Read {
                path: path.display().to_string(),
                message: error.to_string(),
            })?;

        Self::from_yaml(&contents)
    }

    /// Parses and validates configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the text cannot be parsed or holds
    /// invalid values.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigurationError> {
        // An empty document means "all defaults".
        let config: Self = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents)
                .map_err(|error| ConfigurationError::Parse(error.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.listen.listen_type == ListenType::Tcp && self.listen.port == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "listen.port",
                reason: "must be greater than 0",
            });
        }

        if self.storage.mode == StorageMode::MongoDb {
            if self.mongodb.port == 0 {
                return Err(ConfigurationError::InvalidValue {
                    field: "mongodb.port",
                    reason: "must be greater than 0",
                });
            }
            if self.mongodb.database.trim().is_empty() {
                return Err(ConfigurationError::InvalidValue {
                    field: "mongodb.database",
                    reason: "must not be empty",
                });
            }
        }

        if self.sessions.mode == SessionMode::Redis && self.redis.port == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "redis.port",
                reason: "must be greater than 0",
            });
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "server.request_timeout_secs",
                reason: "must be greater than 0",
            });
        }

        Ok(())
    }

    /// Returns the per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Returns the default log filter for the debug flag.
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        if self.is_debug {
            "task_lists_api=debug,tower_http=debug"
        } else {
            "task_lists_api=info,tower_http=info"
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("").unwrap();

        assert!(!config.is_debug);
        assert_eq!(config.listen.listen_type, ListenType::Tcp);
        assert_eq!(config.listen.bind_ip, "0.0.0.0");
        assert_eq!(config.listen.port, 3000);
        assert_eq!(config.storage.mode, StorageMode::MongoDb);
        assert_eq!(config.sessions.mode, SessionMode::Redis);
        assert_eq!(config.mongodb.host, "localhost");
        assert_eq!(config.mongodb.port, 27017);
        assert_eq!(config.mongodb.database, "test");
        assert_eq!(config.redis.port, 6379);
        assert_eq!(config.redis.db, 0);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[rstest]
    fn test_full_document_is_parsed() {
        let yaml = r"
is_debug: true
listen:
  type: sock
storage:
  mode: in_memory
sessions:
  mode: in_memory
mongodb:
  host: db
  port: 27018
  username: app
  password: secret
  database: tasks
  authDB: admin
redis:
  host: cache
  password: pw
  DB: 3
server:
  request_timeout_secs: 5
";
        let config = Config::from_yaml(yaml).unwrap();

        assert!(config.is_debug);
        assert_eq!(config.listen.listen_type, ListenType::Sock);
        assert_eq!(config.storage.mode, StorageMode::InMemory);
        assert_eq!(config.sessions.mode, SessionMode::InMemory);
        assert_eq!(config.mongodb.auth_db, "admin");
        assert_eq!(config.mongodb.database, "tasks");
        assert_eq!(config.redis.db, 3);
        assert_eq!(config.redis.password, "pw");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.default_log_filter(),
            "task_lists_api=debug,tower_http=debug"
        );
    }

    #[rstest]
    #[case("storage:\n  mode: postgres\n")]
    #[case("sessions:\n  mode: memcached\n")]
    #[case("listen: [1, 2]\n")]
    fn test_malformed_document_is_parse_error(#[case] yaml: &str) {
        let result = Config::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigurationError::Parse(_))));
    }

    #[rstest]
    #[case("listen:\n  port: 0\n", "listen.port")]
    #[case("mongodb:\n  database: ''\n", "mongodb.database")]
    #[case("server:\n  request_timeout_secs: 0\n", "server.request_timeout_secs")]
    fn test_invalid_values_are_rejected(#[case] yaml: &str, #[case] expected_field: &str) {
        match Config::from_yaml(yaml) {
            Err(ConfigurationError::InvalidValue { field, .. }) => {
                assert_eq!(field, expected_field);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[rstest]
    fn test_empty_database_is_fine_without_mongodb() {
        let yaml = "storage:\n  mode: in_memory\nmongodb:\n  database: ''\n";
        assert!(Config::from_yaml(yaml).is_ok());
    }

    #[rstest]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "is_debug: true\nlisten:\n  port: 8080").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.is_debug);
        assert_eq!(config.listen.port, 8080);
    }

    #[rstest]
    fn test_load_missing_file_is_read_error() {
        let directory = tempfile::tempdir().unwrap();
        let result = Config::load(directory.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigurationError::Read { .. })));
    }

    #[rstest]
    fn test_debug_output_hides_passwords() {
        let config = Config::from_yaml("mongodb:\n  password: hunter2\nredis:\n  password: pw2\n")
            .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("pw2"));
    }
}
