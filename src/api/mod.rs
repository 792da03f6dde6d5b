//! API module for HTTP handlers.
//!
//! Route table, request extraction, the session gate and the response
//! envelopes.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod task_lists;
pub mod tasks;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use auth::{Authenticated, SESSION_COOKIE, Unauthenticated};
pub use error::{ApiErrorResponse, ErrorEnvelope};
pub use extract::ValidJson;
pub use handlers::{AppState, HealthResponse, health_check};
pub use response::{ApiSuccess, SuccessEnvelope};

use crate::config::Config;

/// Answers 408 once a request outlives the configured deadline.
fn deadline_layer(config: &Config) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, config.request_timeout())
}

/// Builds the application router with tracing and the request deadline.
pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Users
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/current", get(users::current))
        .route("/users/logout", post(users::logout))
        // Task lists
        .route(
            "/tasks-lists/",
            get(task_lists::list_task_lists)
                .post(task_lists::create_task_list)
                .patch(task_lists::update_task_list)
                .delete(task_lists::delete_task_list),
        )
        // Tasks
        .route(
            "/tasks/",
            get(tasks::list_tasks)
                .post(tasks::create_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/clear", delete(tasks::clear_tasks))
        .layer(TraceLayer::new_for_http())
        .layer(deadline_layer(config))
        .with_state(state)
}
