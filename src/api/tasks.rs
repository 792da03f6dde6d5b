//! `/tasks/` handlers.

use axum::extract::State;

use super::auth::Authenticated;
use super::dto::{CreateTaskRequest, DeleteTaskRequest, UpdateTaskRequest};
use super::{ApiErrorResponse, ApiSuccess, AppState, ValidJson};
use crate::domain::Task;

/// `GET /tasks/`: every task the requester owns.
///
/// # Errors
///
/// 401 without a live session; 500 on store failure.
pub async fn list_tasks(
    session: Authenticated,
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<Task>>, ApiErrorResponse> {
    let tasks = state.tasks.list(session.user.id).await?;
    Ok(ApiSuccess(tasks))
}

/// `POST /tasks/`: creates a task, optionally filed under an owned list.
///
/// # Errors
///
/// 401 without a live session; 400 for a bad body; 500 when the named list
/// is not the requester's.
pub async fn create_task(
    session: Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateTaskRequest>,
) -> Result<ApiSuccess<Task>, ApiErrorResponse> {
    let task = state.tasks.create(session.user.id, request.into()).await?;
    Ok(ApiSuccess(task))
}

/// `PATCH /tasks/`: replaces every mutable field of a task.
///
/// # Errors
///
/// 401 without a live session; 400 for a bad body; 500 for an unparsable id
/// or when the task or the named list is not the requester's.
pub async fn update_task(
    session: Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateTaskRequest>,
) -> Result<ApiSuccess<Task>, ApiErrorResponse> {
    let (id, fields) = request.into_parts();
    let task = state.tasks.update(&id, session.user.id, fields).await?;
    Ok(ApiSuccess(task))
}

/// `DELETE /tasks/`: deletes a task and returns its id.
///
/// # Errors
///
/// 401 without a live session; 400 for a bad body; 500 for an unparsable id
/// or when the task is not the requester's.
pub async fn delete_task(
    session: Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<DeleteTaskRequest>,
) -> Result<ApiSuccess<String>, ApiErrorResponse> {
    state.tasks.delete(&request.id, session.user.id).await?;
    Ok(ApiSuccess(request.id))
}

/// `DELETE /tasks/clear`: deletes every task the requester owns.
///
/// # Errors
///
/// 401 without a live session; 500 when there was nothing to remove.
pub async fn clear_tasks(
    session: Authenticated,
    State(state): State<AppState>,
) -> Result<ApiSuccess<&'static str>, ApiErrorResponse> {
    state.tasks.clear(session.user.id).await?;
    Ok(ApiSuccess(""))
}
