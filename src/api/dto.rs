//! Request bodies.
//!
//! Every body rejects unknown fields. `hidden` and `complete` have no
//! default, so omitting them is a decode error.

use serde::Deserialize;
use validator::Validate;

use crate::domain::SubTask;
use crate::service::{TaskFields, TaskListFields};

// =============================================================================
// Users
// =============================================================================

/// Body of `POST /users/register` and `POST /users/login`.
#[derive(Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Task Lists
// =============================================================================

/// Body of `POST /tasks-lists/`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskListRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub color: String,
    pub hidden: bool,
}

impl From<CreateTaskListRequest> for TaskListFields {
    fn from(request: CreateTaskListRequest) -> Self {
        Self {
            name: request.name,
            color: request.color,
            hidden: request.hidden,
        }
    }
}

/// Body of `PATCH /tasks-lists/`.
///
/// Only `id` is constrained; `name` and `color` are stored as given.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskListRequest {
    #[validate(length(min = 1))]
    pub id: String,
    pub name: String,
    pub color: String,
    pub hidden: bool,
}

impl UpdateTaskListRequest {
    /// Splits the body into the target id and the replacement fields.
    #[must_use]
    pub fn into_parts(self) -> (String, TaskListFields) {
        let fields = TaskListFields {
            name: self.name,
            color: self.color,
            hidden: self.hidden,
        };
        (self.id, fields)
    }
}

/// Body of `DELETE /tasks-lists/`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DeleteTaskListRequest {
    #[validate(length(equal = 24))]
    pub id: String,
}

// =============================================================================
// Tasks
// =============================================================================

/// Body of `POST /tasks/`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    /// Absent or `null` leaves the task unassigned.
    #[serde(default)]
    #[validate(length(equal = 24))]
    pub list_id: Option<String>,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub subs: Vec<SubTask>,
    pub complete: bool,
}

impl From<CreateTaskRequest> for TaskFields {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            list_id: request.list_id,
            title: request.title,
            note: request.note,
            subs: request.subs,
            complete: request.complete,
        }
    }
}

/// Body of `PATCH /tasks/`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    #[validate(length(equal = 24))]
    pub list_id: Option<String>,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub subs: Vec<SubTask>,
    pub complete: bool,
}

impl UpdateTaskRequest {
    /// Splits the body into the target id and the replacement fields.
    #[must_use]
    pub fn into_parts(self) -> (String, TaskFields) {
        let fields = TaskFields {
            list_id: self.list_id,
            title: self.title,
            note: self.note,
            subs: self.subs,
            complete: self.complete,
        };
        (self.id, fields)
    }
}

/// Body of `DELETE /tasks/`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DeleteTaskRequest {
    #[validate(length(min = 1))]
    pub id: String,
}

// =============================================================================
// Tests
// =============================================================================
