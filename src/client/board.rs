//! Cached task list with invalidate-on-success.

use tokio::sync::RwLock;

use super::api::{ClientResult, TaskClient};
use crate::task::{NewTask, Task, TaskFilter, TaskId, TaskPatch, TaskStats};

/// A successful mutation that made the cached list stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Created(Task),
    Updated(Task),
    Deleted(TaskId),
}

/// Called after every successful mutation, once the cache is marked stale.
pub type InvalidationListener = Box<dyn Fn(&Mutation) + Send + Sync>;

#[derive(Debug, Default)]
struct Cache {
    /// `None` when stale.
    tasks: Option<Vec<Task>>,
    /// Bumped on every invalidation. A fetch that started under an older
    /// generation must not repopulate the cache.
    generation: u64,
}

/// Task list view backed by a `TaskClient`.
///
/// The cached list is only ever replaced by a full refetch. Mutations never
/// patch it locally; they mark it stale so the next read goes to the server.
pub struct TaskBoard {
    client: TaskClient,
    cache: RwLock<Cache>,
    filter: RwLock<TaskFilter>,
    listeners: RwLock<Vec<InvalidationListener>>,
}

impl TaskBoard {
    pub fn new(client: TaskClient) -> Self {
        Self {
            client,
            cache: RwLock::new(Cache::default()),
            filter: RwLock::new(TaskFilter::default()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn client(&self) -> &TaskClient {
        &self.client
    }

    pub async fn on_invalidate(&self, listener: InvalidationListener) {
        self.listeners.write().await.push(listener);
    }

    pub async fn is_stale(&self) -> bool {
        self.cache.read().await.tasks.is_none()
    }

    /// Drop the cached list so the next read refetches.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.tasks = None;
        cache.generation += 1;
    }

    /// Refetch unconditionally.
    ///
    /// Retries when an invalidation lands while the request is in flight, so
    /// the returned and cached list always postdates every completed mutation.
    pub async fn refresh(&self) -> ClientResult<Vec<Task>> {
        loop {
            let generation = self.cache.read().await.generation;
            let tasks = self.client.list_tasks().await?;

            let mut cache = self.cache.write().await;
            if cache.generation == generation {
                tracing::debug!(count = tasks.len(), "Refetched task list");
                cache.tasks = Some(tasks.clone());
                return Ok(tasks);
            }
            tracing::debug!("Task list invalidated during refetch, retrying");
        }
    }

    /// The full list, refetching first if stale.
    pub async fn tasks(&self) -> ClientResult<Vec<Task>> {
        if let Some(tasks) = self.cache.read().await.tasks.as_ref() {
            return Ok(tasks.clone());
        }
        self.refresh().await
    }

    /// The list narrowed by the current filter.
    pub async fn visible_tasks(&self) -> ClientResult<Vec<Task>> {
        let tasks = self.tasks().await?;
        let filter = self.filter.read().await;
        Ok(tasks.into_iter().filter(|t| filter.matches(t)).collect())
    }

    /// Totals over the unfiltered list.
    pub async fn stats(&self) -> ClientResult<TaskStats> {
        Ok(TaskStats::from_tasks(&self.tasks().await?))
    }

    pub async fn filter(&self) -> TaskFilter {
        self.filter.read().await.clone()
    }

    pub async fn set_filter(&self, filter: TaskFilter) {
        *self.filter.write().await = filter;
    }

    pub async fn create(&self, input: NewTask) -> ClientResult<Task> {
        let task = self.client.create_task(&input).await?;
        self.mutated(Mutation::Created(task.clone())).await;
        Ok(task)
    }

    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> ClientResult<Task> {
        let task = self.client.update_task(id, &patch).await?;
        self.mutated(Mutation::Updated(task.clone())).await;
        Ok(task)
    }

    pub async fn toggle(&self, id: TaskId, completed: bool) -> ClientResult<Task> {
        self.update(id, TaskPatch::completed(completed)).await
    }

    pub async fn delete(&self, id: TaskId) -> ClientResult<()> {
        self.client.delete_task(id).await?;
        self.mutated(Mutation::Deleted(id)).await;
        Ok(())
    }

    async fn mutated(&self, mutation: Mutation) {
        self.invalidate().await;
        for listener in self.listeners.read().await.iter() {
            listener(&mutation);
        }
    }
}
