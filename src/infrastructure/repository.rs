//! Repository traits for domain entities and sessions.
//!
//! Every method returns a boxed future so the traits stay object-safe and
//! backends can be chosen at runtime. Zero-match outcomes are not errors at
//! this layer: lookups return `Option` and deletes return the number of
//! removed records, leaving the policy to the services.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{
    NewTask, NewTaskList, NewUser, RecordId, Task, TaskChanges, TaskList, TaskListChanges, User,
};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Document store connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Session store error.
    #[error("Session store error: {0}")]
    Session(String),

    /// A uniqueness constraint rejected the write.
    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

// =============================================================================
// User Repository
// =============================================================================

/// Persistence for users.
pub trait UserRepository: Send + Sync {
    /// Finds a user by exact email.
    fn find_by_email(&self, email: &str) -> BoxFuture<'static, Result<Option<User>, StoreError>>;

    /// Inserts a user and returns the store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if a user with the same email exists.
    fn insert(&self, user: &NewUser) -> BoxFuture<'static, Result<RecordId, StoreError>>;
}

// =============================================================================
// Task List Repository
// =============================================================================

/// Owner-scoped persistence for task lists.
pub trait TaskListRepository: Send + Sync {
    /// Inserts a task list and returns the store-assigned identifier.
    fn insert(&self, task_list: &NewTaskList) -> BoxFuture<'static, Result<RecordId, StoreError>>;

    /// Returns every task list owned by `owner`, oldest first.
    fn find_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Vec<TaskList>, StoreError>>;

    /// Finds the task list matching both `id` and `owner`.
    fn find_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Option<TaskList>, StoreError>>;

    /// Applies `changes` to the task list matching both `id` and `owner`.
    ///
    /// Returns the record after the update, or `None` if nothing matched.
    fn update_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
        changes: &TaskListChanges,
    ) -> BoxFuture<'static, Result<Option<TaskList>, StoreError>>;

    /// Deletes the task list matching both `id` and `owner`.
    ///
    /// Returns the number of removed records (0 or 1).
    fn delete_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>>;
}

// =============================================================================
// Task Repository
// =============================================================================

/// Owner-scoped persistence for tasks.
pub trait TaskRepository: Send + Sync {
    /// Inserts a task and returns the store-assigned identifier.
    fn insert(&self, task: &NewTask) -> BoxFuture<'static, Result<RecordId, StoreError>>;

    /// Returns every task owned by `owner`, oldest first.
    fn find_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Vec<Task>, StoreError>>;

    /// Applies `changes` to the task matching both `id` and `owner`.
    ///
    /// Returns the record after the update, or `None` if nothing matched.
    fn update_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
        changes: &TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, StoreError>>;

    /// Deletes the task matching both `id` and `owner`.
    ///
    /// Returns the number of removed records (0 or 1).
    fn delete_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>>;

    /// Deletes every task owned by `owner` and returns how many were removed.
    fn delete_all_for_owner(&self, owner: &RecordId)
    -> BoxFuture<'static, Result<u64, StoreError>>;
}

// =============================================================================
// Session Store
// =============================================================================

/// Key-value store mapping session tokens to serialized identities.
///
/// Entries carry no expiry; they live until deleted.
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `token`, if any.
    fn get(&self, token: &str) -> BoxFuture<'static, Result<Option<String>, StoreError>>;

    /// Stores `value` under `token`, replacing any previous value.
    fn set(&self, token: &str, value: &str) -> BoxFuture<'static, Result<(), StoreError>>;

    /// Removes `token`. Returns `true` if an entry existed.
    fn delete(&self, token: &str) -> BoxFuture<'static, Result<bool, StoreError>>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_store_error_display() {
        let error = StoreError::Database("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");

        let error = StoreError::Duplicate("email".to_string());
        assert_eq!(format!("{error}"), "Duplicate key: email");

        let error = StoreError::Session("pool timed out".to_string());
        assert_eq!(format!("{error}"), "Session store error: pool timed out");
    }
}
