//! Task domain model.
//!
//! A task belongs to one user and may be filed under one of that user's
//! task lists. `list_id` is explicitly nullable: `None` means unassigned.

use serde::{Deserialize, Serialize};

use super::{RecordId, Timestamp};

// =============================================================================
// SubTask
// =============================================================================

/// A checklist item inside a task. Order is preserved as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubTask {
    pub title: String,
    pub complete: bool,
}

impl SubTask {
    #[must_use]
    pub fn new(title: impl Into<String>, complete: bool) -> Self {
        Self {
            title: title.into(),
            complete,
        }
    }
}

// =============================================================================
// Task
// =============================================================================

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    /// Owner of the task; every query filters on it.
    pub user_id: RecordId,
    /// Task list the task is filed under, if any.
    pub list_id: Option<RecordId>,
    pub title: String,
    pub note: String,
    pub subs: Vec<SubTask>,
    pub complete: bool,
    #[serde(rename = "CreatedAt")]
    pub created_at: Timestamp,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: Timestamp,
}

/// Creation payload for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub user_id: RecordId,
    pub list_id: Option<RecordId>,
    pub title: String,
    pub note: String,
    pub subs: Vec<SubTask>,
    pub complete: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewTask {
    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_task(self, id: RecordId) -> Task {
        Task {
            id,
            user_id: self.user_id,
            list_id: self.list_id,
            title: self.title,
            note: self.note,
            subs: self.subs,
            complete: self.complete,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Replacement for every mutable task field plus the refreshed update time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub list_id: Option<RecordId>,
    pub title: String,
    pub note: String,
    pub subs: Vec<SubTask>,
    pub complete: bool,
    pub updated_at: Timestamp,
}

impl TaskChanges {
    /// Applies the changes to a record, leaving identity, owner and
    /// creation time untouched.
    #[must_use]
    pub fn apply_to(&self, task: Task) -> Task {
        Task {
            list_id: self.list_id,
            title: self.title.clone(),
            note: self.note.clone(),
            subs: self.subs.clone(),
            complete: self.complete,
            updated_at: self.updated_at,
            ..task
        }
    }
}
