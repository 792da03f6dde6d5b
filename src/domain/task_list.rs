//! Task list domain model.
//!
//! A task list is a named, colored grouping owned by exactly one user.
//! The flow is `NewTaskList` (creation payload, stamped by the caller)
//! → `TaskList` (stored record, also the response projection), and
//! `TaskListChanges` for partial updates.

use serde::{Deserialize, Serialize};

use super::{RecordId, Timestamp};

/// A stored task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: RecordId,
    /// Owner of the list; every query filters on it.
    pub user_id: RecordId,
    pub name: String,
    pub color: String,
    pub hidden: bool,
    #[serde(rename = "CreatedAt")]
    pub created_at: Timestamp,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: Timestamp,
}

/// Creation payload for a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskList {
    pub user_id: RecordId,
    pub name: String,
    pub color: String,
    pub hidden: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewTaskList {
    /// Builds a creation payload owned by `owner`, stamped with `now` for
    /// both timestamps.
    #[must_use]
    pub fn new(
        owner: RecordId,
        name: impl Into<String>,
        color: impl Into<String>,
        hidden: bool,
        now: Timestamp,
    ) -> Self {
        Self {
            user_id: owner,
            name: name.into(),
            color: color.into(),
            hidden,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_task_list(self, id: RecordId) -> TaskList {
        TaskList {
            id,
            user_id: self.user_id,
            name: self.name,
            color: self.color,
            hidden: self.hidden,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Mutable fields of a task list plus the refreshed update time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListChanges {
    pub name: String,
    pub color: String,
    pub hidden: bool,
    pub updated_at: Timestamp,
}

impl TaskListChanges {
    /// Applies the changes to a record, leaving identity, owner and
    /// creation time untouched.
    #[must_use]
    pub fn apply_to(&self, task_list: TaskList) -> TaskList {
        TaskList {
            name: self.name.clone(),
            color: self.color.clone(),
            hidden: self.hidden,
            updated_at: self.updated_at,
            ..task_list
        }
    }
}
