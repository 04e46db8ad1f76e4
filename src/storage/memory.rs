//! In-process task store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TaskStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

#[derive(Debug, Default)]
struct Inner {
    tasks: BTreeMap<TaskId, Task>,
    last_id: TaskId,
}

/// Task store held entirely in memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn create_task(&self, input: NewTask) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let task = Task {
            id: inner.last_id,
            title: input.title,
            description: input.description,
            completed: false,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
