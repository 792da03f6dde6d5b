//! Infrastructure module for external services.
//!
//! Repository traits plus their MongoDB, Redis and in-memory
//! implementations, and the factory that selects between them.

pub mod factory;
pub mod in_memory;
pub mod mongo;
pub mod redis;
pub mod repository;

pub use factory::{FactoryError, Repositories, RepositoryFactory, SessionMode, StorageMode};
pub use in_memory::{
    InMemorySessionStore, InMemoryTaskListRepository, InMemoryTaskRepository,
    InMemoryUserRepository,
};
pub use mongo::{MongoTaskListRepository, MongoTaskRepository, MongoUserRepository};
pub use redis::RedisSessionStore;
pub use repository::{
    SessionStore, StoreError, TaskListRepository, TaskRepository, UserRepository,
};
