//! Owner-scoped task operations.
//!
//! A task naming a list is only written after the list has been confirmed
//! to exist and belong to the requester. The check and the write are two
//! separate store round trips.

use std::sync::Arc;

use super::{ServiceError, TaskListService};
use crate::domain::{NewTask, RecordId, SubTask, Task, TaskChanges, Timestamp};
use crate::infrastructure::TaskRepository;

/// Mutable task fields as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    /// Hex id of the list to file the task under; `None` leaves it unassigned.
    pub list_id: Option<String>,
    pub title: String,
    pub note: String,
    pub subs: Vec<SubTask>,
    pub complete: bool,
}

/// Task CRUD scoped to the requesting user.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository + Send + Sync>,
    task_lists: TaskListService,
}

impl TaskService {
    #[must_use]
    pub fn new(tasks: Arc<dyn TaskRepository + Send + Sync>, task_lists: TaskListService) -> Self {
        Self { tasks, task_lists }
    }

    /// Resolves an optional list reference, checking ownership.
    async fn owned_list(
        &self,
        list_id: Option<&str>,
        owner: RecordId,
    ) -> Result<Option<RecordId>, ServiceError> {
        let Some(list_id) = list_id else {
            return Ok(None);
        };
        let list_id = RecordId::parse(list_id)?;
        self.task_lists.find_owned(list_id, owner).await?;
        Ok(Some(list_id))
    }

    /// Creates a task owned by `owner`.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` if `list_id` does not parse.
    /// - `ServiceError::NotFound` if `list_id` names a list `owner` does not own.
    /// - `ServiceError::Store` on persistence failure.
    pub async fn create(&self, owner: RecordId, fields: TaskFields) -> Result<Task, ServiceError> {
        let list_id = self.owned_list(fields.list_id.as_deref(), owner).await?;

        let now = Timestamp::now();
        let payload = NewTask {
            user_id: owner,
            list_id,
            title: fields.title,
            note: fields.note,
            subs: fields.subs,
            complete: fields.complete,
            created_at: now,
            updated_at: now,
        };

        let id = self.tasks.insert(&payload).await?;
        Ok(payload.into_task(id))
    }

    /// Returns every task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` on persistence failure.
    pub async fn list(&self, owner: RecordId) -> Result<Vec<Task>, ServiceError> {
        Ok(self.tasks.find_all_for_owner(&owner).await?)
    }

    /// Replaces every mutable field of an owned task.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` if `id` or `list_id` does not parse.
    /// - `ServiceError::NotFound` if the list or the task is not owned.
    pub async fn update(
        &self,
        id: &str,
        owner: RecordId,
        fields: TaskFields,
    ) -> Result<Task, ServiceError> {
        let id = RecordId::parse(id)?;
        let list_id = self.owned_list(fields.list_id.as_deref(), owner).await?;

        let changes = TaskChanges {
            list_id,
            title: fields.title,
            note: fields.note,
            subs: fields.subs,
            complete: fields.complete,
            updated_at: Timestamp::now(),
        };

        self.tasks
            .update_for_owner(&id, &owner, &changes)
            .await?
            .ok_or(ServiceError::TASK_NOT_FOUND)
    }

    /// Deletes an owned task.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` if `id` does not parse.
    /// - `ServiceError::NotFound` if nothing was removed.
    pub async fn delete(&self, id: &str, owner: RecordId) -> Result<(), ServiceError> {
        let id = RecordId::parse(id)?;
        match self.tasks.delete_for_owner(&id, &owner).await? {
            0 => Err(ServiceError::TASK_NOT_FOUND),
            _ => Ok(()),
        }
    }

    /// Deletes every task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` when `owner` had no tasks to remove.
    pub async fn clear(&self, owner: RecordId) -> Result<u64, ServiceError> {
        match self.tasks.delete_all_for_owner(&owner).await? {
            0 => Err(ServiceError::TASKS_NOT_FOUND),
            removed => {
                tracing::debug!(user_id = %owner, removed, "Tasks cleared");
                Ok(removed)
            }
        }
    }
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskService")
            .field("tasks", &"Arc<dyn TaskRepository>")
            .field("task_lists", &self.task_lists)
            .finish()
    }
}
