//! Task module - defines the task record, its inputs, and list views.
//!
//! - `Task` is the only persisted entity
//! - `NewTask` and `TaskPatch` carry the single validation contract used by
//!   both the HTTP layer and the client
//! - `TaskFilter` and `TaskStats` are pure functions over a task list

pub mod task;
mod filter;

pub use filter::{StatusFilter, TaskFilter, TaskStats};
pub use task::{NewTask, Task, TaskId, TaskPatch, ValidationError};
