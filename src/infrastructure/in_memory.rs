//! In-memory repository implementations.
//!
//! These honour the same contracts as the MongoDB and Redis adapters
//! (unique email, owner scoping, affected counts) and back the test-suite
//! and the `in_memory` storage/session modes.
//!
//! Each store is an `Arc<RwLock<HashMap<..>>>`, so clones share state.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::domain::{
    NewTask, NewTaskList, NewUser, RecordId, Task, TaskChanges, TaskList, TaskListChanges, User,
};
use crate::infrastructure::{
    SessionStore, StoreError, TaskListRepository, TaskRepository, UserRepository,
};

// =============================================================================
// In-Memory User Repository
// =============================================================================

/// In-memory implementation of `UserRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<RecordId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory user repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_email(&self, email: &str) -> BoxFuture<'static, Result<Option<User>, StoreError>> {
        let users = Arc::clone(&self.users);
        let email = email.to_string();
        Box::pin(async move {
            let guard = users.read().await;
            Ok(guard.values().find(|user| user.email == email).cloned())
        })
    }

    fn insert(&self, user: &NewUser) -> BoxFuture<'static, Result<RecordId, StoreError>> {
        let users = Arc::clone(&self.users);
        let user = user.clone();
        Box::pin(async move {
            let mut guard = users.write().await;

            // Check and insert under one write lock, like a unique index.
            if guard.values().any(|existing| existing.email == user.email) {
                return Err(StoreError::Duplicate(format!("email '{}'", user.email)));
            }

            let id = RecordId::generate();
            guard.insert(id, user.into_user(id));
            Ok(id)
        })
    }
}

// =============================================================================
// In-Memory Task List Repository
// =============================================================================

/// In-memory implementation of `TaskListRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskListRepository {
    task_lists: Arc<RwLock<HashMap<RecordId, TaskList>>>,
}

impl InMemoryTaskListRepository {
    /// Creates a new empty in-memory task list repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskListRepository for InMemoryTaskListRepository {
    fn insert(&self, task_list: &NewTaskList) -> BoxFuture<'static, Result<RecordId, StoreError>> {
        let task_lists = Arc::clone(&self.task_lists);
        let task_list = task_list.clone();
        Box::pin(async move {
            let id = RecordId::generate();
            task_lists
                .write()
                .await
                .insert(id, task_list.into_task_list(id));
            Ok(id)
        })
    }

    fn find_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Vec<TaskList>, StoreError>> {
        let task_lists = Arc::clone(&self.task_lists);
        let owner = *owner;
        Box::pin(async move {
            let guard = task_lists.read().await;
            let mut owned: Vec<TaskList> = guard
                .values()
                .filter(|task_list| task_list.user_id == owner)
                .cloned()
                .collect();
            drop(guard);

            owned.sort_by_key(|task_list| (task_list.created_at, task_list.id));
            Ok(owned)
        })
    }

    fn find_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Option<TaskList>, StoreError>> {
        let task_lists = Arc::clone(&self.task_lists);
        let (id, owner) = (*id, *owner);
        Box::pin(async move {
            let guard = task_lists.read().await;
            Ok(guard
                .get(&id)
                .filter(|task_list| task_list.user_id == owner)
                .cloned())
        })
    }

    fn update_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
        changes: &TaskListChanges,
    ) -> BoxFuture<'static, Result<Option<TaskList>, StoreError>> {
        let task_lists = Arc::clone(&self.task_lists);
        let (id, owner) = (*id, *owner);
        let changes = changes.clone();
        Box::pin(async move {
            let mut guard = task_lists.write().await;
            let Some(existing) = guard.get(&id).filter(|task_list| task_list.user_id == owner)
            else {
                return Ok(None);
            };

            let updated = changes.apply_to(existing.clone());
            guard.insert(id, updated.clone());
            Ok(Some(updated))
        })
    }

    fn delete_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>> {
        let task_lists = Arc::clone(&self.task_lists);
        let (id, owner) = (*id, *owner);
        Box::pin(async move {
            let mut guard = task_lists.write().await;
            let owned = guard
                .get(&id)
                .is_some_and(|task_list| task_list.user_id == owner);
            if owned {
                guard.remove(&id);
            }
            Ok(u64::from(owned))
        })
    }
}

// =============================================================================
// In-Memory Task Repository
// =============================================================================

/// In-memory implementation of `TaskRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<RecordId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn insert(&self, task: &NewTask) -> BoxFuture<'static, Result<RecordId, StoreError>> {
        let tasks = Arc::clone(&self.tasks);
        let task = task.clone();
        Box::pin(async move {
            let id = RecordId::generate();
            tasks.write().await.insert(id, task.into_task(id));
            Ok(id)
        })
    }

    fn find_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Vec<Task>, StoreError>> {
        let tasks = Arc::clone(&self.tasks);
        let owner = *owner;
        Box::pin(async move {
            let guard = tasks.read().await;
            let mut owned: Vec<Task> = guard
                .values()
                .filter(|task| task.user_id == owner)
                .cloned()
                .collect();
            drop(guard);

            owned.sort_by_key(|task| (task.created_at, task.id));
            Ok(owned)
        })
    }

    fn update_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
        changes: &TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, StoreError>> {
        let tasks = Arc::clone(&self.tasks);
        let (id, owner) = (*id, *owner);
        let changes = changes.clone();
        Box::pin(async move {
            let mut guard = tasks.write().await;
            let Some(existing) = guard.get(&id).filter(|task| task.user_id == owner) else {
                return Ok(None);
            };

            let updated = changes.apply_to(existing.clone());
            guard.insert(id, updated.clone());
            Ok(Some(updated))
        })
    }

    fn delete_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>> {
        let tasks = Arc::clone(&self.tasks);
        let (id, owner) = (*id, *owner);
        Box::pin(async move {
            let mut guard = tasks.write().await;
            let owned = guard.get(&id).is_some_and(|task| task.user_id == owner);
            if owned {
                guard.remove(&id);
            }
            Ok(u64::from(owned))
        })
    }

    fn delete_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>> {
        let tasks = Arc::clone(&self.tasks);
        let owner = *owner;
        Box::pin(async move {
            let mut guard = tasks.write().await;
            let before = guard.len();
            guard.retain(|_, task| task.user_id != owner);
            Ok((before - guard.len()) as u64)
        })
    }
}

// =============================================================================
// In-Memory Session Store
// =============================================================================

/// In-memory implementation of `SessionStore`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty in-memory session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, token: &str) -> BoxFuture<'static, Result<Option<String>, StoreError>> {
        let sessions = Arc::clone(&self.sessions);
        let token = token.to_string();
        Box::pin(async move { Ok(sessions.read().await.get(&token).cloned()) })
    }

    fn set(&self, token: &str, value: &str) -> BoxFuture<'static, Result<(), StoreError>> {
        let sessions = Arc::clone(&self.sessions);
        let (token, value) = (token.to_string(), value.to_string());
        Box::pin(async move {
            sessions.write().await.insert(token, value);
            Ok(())
        })
    }

    fn delete(&self, token: &str) -> BoxFuture<'static, Result<bool, StoreError>> {
        let sessions = Arc::clone(&self.sessions);
        let token = token.to_string();
        Box::pin(async move { Ok(sessions.write().await.remove(&token).is_some()) })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SubTask, Timestamp};
    use rstest::rstest;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_task(owner: RecordId) -> NewTask {
        let now = Timestamp::now();
        NewTask {
            user_id: owner,
            list_id: None,
            title: "Task".to_string(),
            note: String::new(),
            subs: vec![SubTask::new("sub", false)],
            complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_user_insert_rejects_duplicate_email() {
        let repository = InMemoryUserRepository::new();

        let id = repository.insert(&new_user("a@x.com")).await.unwrap();
        let found = repository.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, id);

        let duplicate = repository.insert(&new_user("a@x.com")).await;
        assert!(matches!(duplicate, Err(StoreError::Duplicate(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_user_find_by_unknown_email_is_none() {
        let repository = InMemoryUserRepository::new();
        assert!(repository.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_task_list_lookups_are_owner_scoped() {
        let repository = InMemoryTaskListRepository::new();
        let owner = RecordId::generate();
        let stranger = RecordId::generate();
        let payload = NewTaskList::new(owner, "Home", "#fff", false, Timestamp::now());

        let id = repository.insert(&payload).await.unwrap();

        assert!(repository.find_for_owner(&id, &owner).await.unwrap().is_some());
        assert!(repository.find_for_owner(&id, &stranger).await.unwrap().is_none());
        assert!(repository.find_all_for_owner(&stranger).await.unwrap().is_empty());
        assert_eq!(repository.delete_for_owner(&id, &stranger).await.unwrap(), 0);
        assert_eq!(repository.delete_for_owner(&id, &owner).await.unwrap(), 1);
        assert_eq!(repository.delete_for_owner(&id, &owner).await.unwrap(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_task_list_update_returns_post_update_record() {
        let repository = InMemoryTaskListRepository::new();
        let owner = RecordId::generate();
        let payload = NewTaskList::new(owner, "Home", "#fff", false, Timestamp::now());
        let id = repository.insert(&payload).await.unwrap();

        let changes = TaskListChanges {
            name: "Work".to_string(),
            color: "#000".to_string(),
            hidden: true,
            updated_at: Timestamp::now(),
        };
        let updated = repository
            .update_for_owner(&id, &owner, &changes)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Work");
        assert!(updated.hidden);

        let missing = repository
            .update_for_owner(&id, &RecordId::generate(), &changes)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_task_delete_all_counts_only_owned_tasks() {
        let repository = InMemoryTaskRepository::new();
        let owner = RecordId::generate();
        let other = RecordId::generate();

        repository.insert(&new_task(owner)).await.unwrap();
        repository.insert(&new_task(owner)).await.unwrap();
        repository.insert(&new_task(other)).await.unwrap();

        assert_eq!(repository.delete_all_for_owner(&owner).await.unwrap(), 2);
        assert_eq!(repository.delete_all_for_owner(&owner).await.unwrap(), 0);
        assert_eq!(repository.find_all_for_owner(&other).await.unwrap().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_session_store_set_get_delete() {
        let store = InMemorySessionStore::new();

        assert!(store.get("token").await.unwrap().is_none());
        store.set("token", "value").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("value"));
        assert!(store.delete("token").await.unwrap());
        assert!(!store.delete("token").await.unwrap());
    }
}
