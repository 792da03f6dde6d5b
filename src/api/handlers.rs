//! Shared handler state and the health endpoint.

use axum::Json;

use crate::infrastructure::Repositories;
use crate::service::{SessionService, TaskListService, TaskService, UserService};

// =============================================================================
// Application State
// =============================================================================

/// Application state shared across all handlers.
///
/// Every service holds `Arc`s to its repositories, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    pub users: UserService,
    pub task_lists: TaskListService,
    pub tasks: TaskService,
    pub sessions: SessionService,
}

impl AppState {
    /// Creates a new `AppState` from initialized repositories.
    #[must_use]
    pub fn from_repositories(repositories: Repositories) -> Self {
        let task_lists = TaskListService::new(repositories.task_lists);
        Self {
            users: UserService::new(repositories.users),
            tasks: TaskService::new(repositories.tasks, task_lists.clone()),
            task_lists,
            sessions: SessionService::new(repositories.sessions),
        }
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// Not wrapped in the response envelope and not behind the session gate.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
