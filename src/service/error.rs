//! Service-level error type.

use thiserror::Error;

use crate::domain::InvalidIdentifier;
use crate::infrastructure::StoreError;

/// Errors produced by the resource services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No record owned by the requester matched.
    #[error("{0}")]
    NotFound(&'static str),

    /// Registration with an email that is already taken.
    #[error("user with this email already exists")]
    AlreadyExists,

    /// Login with an unknown email or a wrong password.
    #[error("wrong email or password")]
    InvalidCredentials,

    /// An identifier failed to parse.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    /// Persistence or session store fault.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing fault.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl ServiceError {
    pub const TASK_LIST_NOT_FOUND: Self = Self::NotFound("tasks list not found");
    pub const TASK_NOT_FOUND: Self = Self::NotFound("task not found");
    pub const TASKS_NOT_FOUND: Self = Self::NotFound("tasks not found");
}
