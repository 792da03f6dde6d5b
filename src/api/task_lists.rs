//! `/tasks-lists/` handlers.
//!
//! All routes require a live session and act only on the requester's lists.

use axum::extract::State;

use super::auth::Authenticated;
use super::dto::{CreateTaskListRequest, DeleteTaskListRequest, UpdateTaskListRequest};
use super::{ApiErrorResponse, ApiSuccess, AppState, ValidJson};
use crate::domain::TaskList;

/// `GET /tasks-lists/`: every list the requester owns.
///
/// # Errors
///
/// 401 without a live session; 500 on store failure.
pub async fn list_task_lists(
    session: Authenticated,
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<TaskList>>, ApiErrorResponse> {
    let task_lists = state.task_lists.list(session.user.id).await?;
    Ok(ApiSuccess(task_lists))
}

/// `POST /tasks-lists/`: creates a list.
///
/// # Errors
///
/// 401 without a live session; 400 for a bad body; 500 on store failure.
pub async fn create_task_list(
    session: Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateTaskListRequest>,
) -> Result<ApiSuccess<TaskList>, ApiErrorResponse> {
    let task_list = state
        .task_lists
        .create(session.user.id, request.into())
        .await?;
    Ok(ApiSuccess(task_list))
}

/// `PATCH /tasks-lists/`: replaces name, color and hidden flag.
///
/// # Errors
///
/// 401 without a live session; 400 for a bad body; 500 for an unparsable id
/// or when the list is not the requester's.
pub async fn update_task_list(
    session: Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateTaskListRequest>,
) -> Result<ApiSuccess<TaskList>, ApiErrorResponse> {
    let (id, fields) = request.into_parts();
    let task_list = state
        .task_lists
        .update(&id, session.user.id, fields)
        .await?;
    Ok(ApiSuccess(task_list))
}

/// `DELETE /tasks-lists/`: deletes a list and returns its id.
///
/// # Errors
///
/// 401 without a live session; 400 for a bad body; 500 for an unparsable id
/// or when the list is not the requester's.
pub async fn delete_task_list(
    session: Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<DeleteTaskListRequest>,
) -> Result<ApiSuccess<String>, ApiErrorResponse> {
    state
        .task_lists
        .delete(&request.id, session.user.id)
        .await?;
    Ok(ApiSuccess(request.id))
}
