//! MongoDB repository implementations.
//!
//! One collection per entity: `users`, `tasks-lists` and `tasks`. Records
//! are mapped through private document structs so that the wire shape of the
//! domain types never leaks into storage. Owner and list references are kept
//! as hex strings; timestamps are native BSON datetimes.

use futures::TryStreamExt;
use futures::future::BoxFuture;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, DateTime, doc};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, Credential, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::config::MongoConfig;
use crate::domain::{
    NewTask, NewTaskList, NewUser, RecordId, SubTask, Task, TaskChanges, TaskList,
    TaskListChanges, Timestamp, User,
};
use crate::infrastructure::{StoreError, TaskListRepository, TaskRepository, UserRepository};

const USERS_COLLECTION: &str = "users";
const TASK_LISTS_COLLECTION: &str = "tasks-lists";
const TASKS_COLLECTION: &str = "tasks";

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

// =============================================================================
// Connection
// =============================================================================

/// Connects to MongoDB, verifies the connection with a `ping` and ensures
/// the unique index on `users.email`.
///
/// Credentials are attached only when both username and password are set;
/// the authentication database falls back to the target database.
///
/// # Errors
///
/// Returns `StoreError::Database` if the options are invalid, the server
/// does not answer the ping, or the index cannot be created.
pub async fn connect(config: &MongoConfig) -> Result<Database, StoreError> {
    let uri = format!("mongodb://{}:{}", config.host, config.port);
    let mut options = ClientOptions::parse(&uri)
        .await
        .map_err(|error| StoreError::Database(error.to_string()))?;

    if !config.username.is_empty() && !config.password.is_empty() {
        let source = if config.auth_db.is_empty() {
            config.database.clone()
        } else {
            config.auth_db.clone()
        };
        options.credential = Some(
            Credential::builder()
                .username(config.username.clone())
                .password(config.password.clone())
                .source(source)
                .build(),
        );
    }

    let client =
        Client::with_options(options).map_err(|error| StoreError::Database(error.to_string()))?;
    let database = client.database(&config.database);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|error| StoreError::Database(format!("ping failed: {error}")))?;

    ensure_indexes(&database).await?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to MongoDB"
    );

    Ok(database)
}

async fn ensure_indexes(database: &Database) -> Result<(), StoreError> {
    let index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    database
        .collection::<UserDocument>(USERS_COLLECTION)
        .create_index(index)
        .await
        .map_err(|error| StoreError::Database(error.to_string()))?;

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn database_error(error: &MongoError) -> StoreError {
    StoreError::Database(error.to_string())
}

fn is_duplicate_key(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

fn inserted_id(id: &Bson) -> Result<RecordId, StoreError> {
    id.as_object_id()
        .map(RecordId::from_object_id)
        .ok_or_else(|| StoreError::Serialization(format!("unexpected inserted id: {id}")))
}

fn stored_id(id: Option<ObjectId>) -> Result<RecordId, StoreError> {
    id.map(RecordId::from_object_id)
        .ok_or_else(|| StoreError::Serialization("document without _id".to_string()))
}

fn parse_reference(value: &str) -> Result<RecordId, StoreError> {
    RecordId::parse(value).map_err(|error| StoreError::Serialization(error.to_string()))
}

fn to_bson_datetime(timestamp: Timestamp) -> DateTime {
    DateTime::from_millis(timestamp.timestamp_millis())
}

fn from_bson_datetime(datetime: DateTime) -> Timestamp {
    Timestamp::from_millis(datetime.timestamp_millis())
}

fn owner_filter(id: &RecordId, owner: &RecordId) -> bson::Document {
    doc! { "_id": *id.as_object_id(), "user_id": owner.to_hex() }
}

// =============================================================================
// Documents
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    hash: String,
}

impl UserDocument {
    fn into_user(self) -> Result<User, StoreError> {
        Ok(User {
            id: stored_id(self.id)?,
            email: self.email,
            password_hash: self.hash,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskListDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    name: String,
    color: String,
    hidden: bool,
    #[serde(rename = "CreatedAt")]
    created_at: DateTime,
    #[serde(rename = "UpdatedAt")]
    updated_at: DateTime,
}

impl TaskListDocument {
    fn from_new(task_list: &NewTaskList) -> Self {
        Self {
            id: None,
            user_id: task_list.user_id.to_hex(),
            name: task_list.name.clone(),
            color: task_list.color.clone(),
            hidden: task_list.hidden,
            created_at: to_bson_datetime(task_list.created_at),
            updated_at: to_bson_datetime(task_list.updated_at),
        }
    }

    fn into_task_list(self) -> Result<TaskList, StoreError> {
        Ok(TaskList {
            id: stored_id(self.id)?,
            user_id: parse_reference(&self.user_id)?,
            name: self.name,
            color: self.color,
            hidden: self.hidden,
            created_at: from_bson_datetime(self.created_at),
            updated_at: from_bson_datetime(self.updated_at),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    #[serde(default)]
    list_id: Option<String>,
    title: String,
    #[serde(default)]
    note: String,
    #[serde(default)]
    subs: Vec<SubTask>,
    complete: bool,
    #[serde(rename = "CreatedAt")]
    created_at: DateTime,
    #[serde(rename = "UpdatedAt")]
    updated_at: DateTime,
}

impl TaskDocument {
    fn from_new(task: &NewTask) -> Self {
        Self {
            id: None,
            user_id: task.user_id.to_hex(),
            list_id: task.list_id.map(|list_id| list_id.to_hex()),
            title: task.title.clone(),
            note: task.note.clone(),
            subs: task.subs.clone(),
            complete: task.complete,
            created_at: to_bson_datetime(task.created_at),
            updated_at: to_bson_datetime(task.updated_at),
        }
    }

    fn into_task(self) -> Result<Task, StoreError> {
        // Older documents may carry an empty string for "no list".
        let list_id = match self.list_id.as_deref() {
            None | Some("") => None,
            Some(value) => Some(parse_reference(value)?),
        };

        Ok(Task {
            id: stored_id(self.id)?,
            user_id: parse_reference(&self.user_id)?,
            list_id,
            title: self.title,
            note: self.note,
            subs: self.subs,
            complete: self.complete,
            created_at: from_bson_datetime(self.created_at),
            updated_at: from_bson_datetime(self.updated_at),
        })
    }
}

// =============================================================================
// MongoDB User Repository
// =============================================================================

/// MongoDB implementation of `UserRepository`.
#[derive(Debug, Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Creates a repository over the `users` collection of `database`.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }
}

impl UserRepository for MongoUserRepository {
    fn find_by_email(&self, email: &str) -> BoxFuture<'static, Result<Option<User>, StoreError>> {
        let collection = self.collection.clone();
        let filter = doc! { "email": email };
        Box::pin(async move {
            let document = collection
                .find_one(filter)
                .await
                .map_err(|error| database_error(&error))?;
            document.map(UserDocument::into_user).transpose()
        })
    }

    fn insert(&self, user: &NewUser) -> BoxFuture<'static, Result<RecordId, StoreError>> {
        let collection = self.collection.clone();
        let document = UserDocument {
            id: None,
            email: user.email.clone(),
            hash: user.password_hash.clone(),
        };
        Box::pin(async move {
            let result = collection.insert_one(&document).await.map_err(|error| {
                if is_duplicate_key(&error) {
                    StoreError::Duplicate(format!("email '{}'", document.email))
                } else {
                    database_error(&error)
                }
            })?;
            inserted_id(&result.inserted_id)
        })
    }
}

// =============================================================================
// MongoDB Task List Repository
// =============================================================================

/// MongoDB implementation of `TaskListRepository`.
#[derive(Debug, Clone)]
pub struct MongoTaskListRepository {
    collection: Collection<TaskListDocument>,
}

impl MongoTaskListRepository {
    /// Creates a repository over the `tasks-lists` collection of `database`.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(TASK_LISTS_COLLECTION),
        }
    }
}

impl TaskListRepository for MongoTaskListRepository {
    fn insert(&self, task_list: &NewTaskList) -> BoxFuture<'static, Result<RecordId, StoreError>> {
        let collection = self.collection.clone();
        let document = TaskListDocument::from_new(task_list);
        Box::pin(async move {
            let result = collection
                .insert_one(document)
                .await
                .map_err(|error| database_error(&error))?;
            inserted_id(&result.inserted_id)
        })
    }

    fn find_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Vec<TaskList>, StoreError>> {
        let collection = self.collection.clone();
        let filter = doc! { "user_id": owner.to_hex() };
        Box::pin(async move {
            let documents: Vec<TaskListDocument> = collection
                .find(filter)
                .sort(doc! { "CreatedAt": 1, "_id": 1 })
                .await
                .map_err(|error| database_error(&error))?
                .try_collect()
                .await
                .map_err(|error| database_error(&error))?;

            documents
                .into_iter()
                .map(TaskListDocument::into_task_list)
                .collect()
        })
    }

    fn find_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Option<TaskList>, StoreError>> {
        let collection = self.collection.clone();
        let filter = owner_filter(id, owner);
        Box::pin(async move {
            let document = collection
                .find_one(filter)
                .await
                .map_err(|error| database_error(&error))?;
            document.map(TaskListDocument::into_task_list).transpose()
        })
    }

    fn update_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
        changes: &TaskListChanges,
    ) -> BoxFuture<'static, Result<Option<TaskList>, StoreError>> {
        let collection = self.collection.clone();
        let filter = owner_filter(id, owner);
        let update = doc! {
            "$set": {
                "name": changes.name.clone(),
                "color": changes.color.clone(),
                "hidden": changes.hidden,
                "UpdatedAt": to_bson_datetime(changes.updated_at),
            }
        };
        Box::pin(async move {
            let document = collection
                .find_one_and_update(filter, update)
                .return_document(ReturnDocument::After)
                .await
                .map_err(|error| database_error(&error))?;
            document.map(TaskListDocument::into_task_list).transpose()
        })
    }

    fn delete_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>> {
        let collection = self.collection.clone();
        let filter = owner_filter(id, owner);
        Box::pin(async move {
            let result = collection
                .delete_one(filter)
                .await
                .map_err(|error| database_error(&error))?;
            Ok(result.deleted_count)
        })
    }
}

// =============================================================================
// MongoDB Task Repository
// =============================================================================

/// MongoDB implementation of `TaskRepository`.
#[derive(Debug, Clone)]
pub struct MongoTaskRepository {
    collection: Collection<TaskDocument>,
}

impl MongoTaskRepository {
    /// Creates a repository over the `tasks` collection of `database`.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(TASKS_COLLECTION),
        }
    }
}

impl TaskRepository for MongoTaskRepository {
    fn insert(&self, task: &NewTask) -> BoxFuture<'static, Result<RecordId, StoreError>> {
        let collection = self.collection.clone();
        let document = TaskDocument::from_new(task);
        Box::pin(async move {
            let result = collection
                .insert_one(document)
                .await
                .map_err(|error| database_error(&error))?;
            inserted_id(&result.inserted_id)
        })
    }

    fn find_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<Vec<Task>, StoreError>> {
        let collection = self.collection.clone();
        let filter = doc! { "user_id": owner.to_hex() };
        Box::pin(async move {
            let documents: Vec<TaskDocument> = collection
                .find(filter)
                .sort(doc! { "CreatedAt": 1, "_id": 1 })
                .await
                .map_err(|error| database_error(&error))?
                .try_collect()
                .await
                .map_err(|error| database_error(&error))?;

            documents.into_iter().map(TaskDocument::into_task).collect()
        })
    }

    fn update_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
        changes: &TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, StoreError>> {
        let collection = self.collection.clone();
        let filter = owner_filter(id, owner);
        let subs = bson::to_bson(&changes.subs);
        let list_id = changes.list_id.map(|list_id| list_id.to_hex());
        let (title, note, complete) = (changes.title.clone(), changes.note.clone(), changes.complete);
        let updated_at = to_bson_datetime(changes.updated_at);
        Box::pin(async move {
            let subs = subs.map_err(|error| StoreError::Serialization(error.to_string()))?;
            let update = doc! {
                "$set": {
                    "list_id": list_id,
                    "title": title,
                    "note": note,
                    "subs": subs,
                    "complete": complete,
                    "UpdatedAt": updated_at,
                }
            };

            let document = collection
                .find_one_and_update(filter, update)
                .return_document(ReturnDocument::After)
                .await
                .map_err(|error| database_error(&error))?;
            document.map(TaskDocument::into_task).transpose()
        })
    }

    fn delete_for_owner(
        &self,
        id: &RecordId,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>> {
        let collection = self.collection.clone();
        let filter = owner_filter(id, owner);
        Box::pin(async move {
            let result = collection
                .delete_one(filter)
                .await
                .map_err(|error| database_error(&error))?;
            Ok(result.deleted_count)
        })
    }

    fn delete_all_for_owner(
        &self,
        owner: &RecordId,
    ) -> BoxFuture<'static, Result<u64, StoreError>> {
        let collection = self.collection.clone();
        let filter = doc! { "user_id": owner.to_hex() };
        Box::pin(async move {
            let result = collection
                .delete_many(filter)
                .await
                .map_err(|error| database_error(&error))?;
            Ok(result.deleted_count)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
