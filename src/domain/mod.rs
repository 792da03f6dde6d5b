//! Domain module for users, task lists and tasks.
//!
//! Pure data shaping: creation/update payloads, stored records and the
//! projections returned to clients.

pub mod task;
pub mod task_list;
pub mod user;
pub mod values;

pub use task::{NewTask, SubTask, Task, TaskChanges};
pub use task_list::{NewTaskList, TaskList, TaskListChanges};
pub use user::{CurrentUser, NewUser, User};
pub use values::{InvalidIdentifier, RecordId, Timestamp};
