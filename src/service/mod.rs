//! Resource services.
//!
//! One service per entity, each wrapping its repository with owner-scoped
//! operations, plus password hashing and session handling.

pub mod error;
pub mod password;
pub mod session;
pub mod task_lists;
pub mod tasks;
pub mod users;

pub use error::ServiceError;
pub use session::SessionService;
pub use task_lists::{TaskListFields, TaskListService};
pub use tasks::{TaskFields, TaskService};
pub use users::UserService;
