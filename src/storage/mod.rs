//! Task storage.
//!
//! `TaskStore` is the persistence seam: the HTTP layer only ever sees
//! `Arc<dyn TaskStore>`. Two backends are provided:
//! - `SqliteTaskStore`: durable, one `tasks` table
//! - `MemoryTaskStore`: process-local, used for ephemeral runs and tests

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::task::{NewTask, Task, TaskId, TaskPatch};

pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection poisoned by a panicked query")]
    Poisoned,

    #[error("Database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD over task records. Callers validate inputs before calling.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks in insertion order.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Persist a new pending task and return it with its assigned id.
    async fn create_task(&self, input: NewTask) -> StoreResult<Task>;

    /// Apply the supplied fields and return the updated task.
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task>;

    async fn delete_task(&self, id: TaskId) -> StoreResult<()>;
}

/// Shared store handle.
pub type SharedTaskStore = Arc<dyn TaskStore>;
