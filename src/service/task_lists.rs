//! Owner-scoped task list operations.

use std::sync::Arc;

use super::ServiceError;
use crate::domain::{NewTaskList, RecordId, TaskList, TaskListChanges, Timestamp};
use crate::infrastructure::TaskListRepository;

/// Mutable task list fields as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListFields {
    pub name: String,
    pub color: String,
    pub hidden: bool,
}

/// Task list CRUD scoped to the requesting user.
#[derive(Clone)]
pub struct TaskListService {
    task_lists: Arc<dyn TaskListRepository + Send + Sync>,
}

impl TaskListService {
    #[must_use]
    pub fn new(task_lists: Arc<dyn TaskListRepository + Send + Sync>) -> Self {
        Self { task_lists }
    }

    /// Creates a task list owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` on persistence failure.
    pub async fn create(
        &self,
        owner: RecordId,
        fields: TaskListFields,
    ) -> Result<TaskList, ServiceError> {
        let payload = NewTaskList::new(
            owner,
            fields.name,
            fields.color,
            fields.hidden,
            Timestamp::now(),
        );
        let id = self.task_lists.insert(&payload).await?;
        Ok(payload.into_task_list(id))
    }

    /// Returns every task list owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` on persistence failure.
    pub async fn list(&self, owner: RecordId) -> Result<Vec<TaskList>, ServiceError> {
        Ok(self.task_lists.find_all_for_owner(&owner).await?)
    }

    /// Returns the task list `id` if `owner` owns it.
    pub(crate) async fn find_owned(
        &self,
        id: RecordId,
        owner: RecordId,
    ) -> Result<TaskList, ServiceError> {
        self.task_lists
            .find_for_owner(&id, &owner)
            .await?
            .ok_or(ServiceError::TASK_LIST_NOT_FOUND)
    }

    /// Replaces name, color and hidden flag of an owned task list.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` if `id` does not parse.
    /// - `ServiceError::NotFound` if no owned list matches.
    pub async fn update(
        &self,
        id: &str,
        owner: RecordId,
        fields: TaskListFields,
    ) -> Result<TaskList, ServiceError> {
        let id = RecordId::parse(id)?;
        let changes = TaskListChanges {
            name: fields.name,
            color: fields.color,
            hidden: fields.hidden,
            updated_at: Timestamp::now(),
        };

        self.task_lists
            .update_for_owner(&id, &owner, &changes)
            .await?
            .ok_or(ServiceError::TASK_LIST_NOT_FOUND)
    }

    /// Deletes an owned task list. Tasks filed under it are left in place.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` if `id` does not parse.
    /// - `ServiceError::NotFound` if nothing was removed.
    pub async fn delete(&self, id: &str, owner: RecordId) -> Result<(), ServiceError> {
        let id = RecordId::parse(id)?;
        match self.task_lists.delete_for_owner(&id, &owner).await? {
            0 => Err(ServiceError::TASK_LIST_NOT_FOUND),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for TaskListService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskListService")
            .field("task_lists", &"Arc<dyn TaskListRepository>")
            .finish()
    }
}
