//! SQLite-backed task store.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{StoreError, StoreResult, TaskStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

// AUTOINCREMENT keeps ids strictly increasing even after deletes.
const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);";
const SELECT_TASKS: &str = "SELECT id, title, description, completed FROM tasks ORDER BY id";
const INSERT_TASK: &str = "INSERT INTO tasks (title, description) VALUES (?1, ?2)
    RETURNING id, title, description, completed";
const UPDATE_TASK: &str = "UPDATE tasks SET
    title = COALESCE(?1, title),
    description = COALESCE(?2, description),
    completed = COALESCE(?3, completed)
    WHERE id = ?4
    RETURNING id, title, description, completed";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Task store over a single SQLite connection.
///
/// Every operation is one statement, so the connection mutex is the only
/// coordination needed. Statements run on the blocking thread pool.
pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskStore {
    /// Open (or create) the database file at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        tracing::info!("Opened task database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Fresh private in-memory database.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute(SCHEMA_TASKS, [])
            .context("Failed to create tasks table")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection off the async executor.
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> StoreResult<T> {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&*guard)
        })
        .await?
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
    })
}

fn select_tasks(conn: &Connection) -> rusqlite::Result<Vec<Task>> {
    let mut stmt = conn.prepare_cached(SELECT_TASKS)?;
    let rows = stmt.query_map([], task_from_row)?;
    rows.collect()
}

fn insert_task(conn: &Connection, input: &NewTask) -> rusqlite::Result<Task> {
    conn.query_row(
        INSERT_TASK,
        params![input.title, input.description],
        task_from_row,
    )
}

fn patch_task(conn: &Connection, id: TaskId, patch: &TaskPatch) -> rusqlite::Result<Option<Task>> {
    conn.query_row(
        UPDATE_TASK,
        params![patch.title, patch.description, patch.completed, id],
        task_from_row,
    )
    .optional()
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.with_conn(|conn| Ok(select_tasks(conn)?)).await
    }

    async fn create_task(&self, input: NewTask) -> StoreResult<Task> {
        self.with_conn(move |conn| Ok(insert_task(conn, &input)?))
            .await
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.with_conn(move |conn| {
            patch_task(conn, id, &patch)?.ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.with_conn(move |conn| {
            let affected = conn.execute(DELETE_TASK, params![id])?;
            if affected == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract;
    use tempfile::tempdir;

    fn store() -> SqliteTaskStore {
        SqliteTaskStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_pending_ids() {
        contract::create_assigns_fresh_pending_ids(&store()).await;
    }

    #[tokio::test]
    async fn test_round_trip() {
        contract::round_trip(&store()).await;
    }

    #[tokio::test]
    async fn test_partial_update() {
        contract::partial_update_only_changes_supplied_fields(&store()).await;
    }

    #[tokio::test]
    async fn test_missing_ids() {
        contract::missing_ids_are_not_found(&store()).await;
    }

    #[tokio::test]
    async fn test_delete() {
        contract::delete_removes_task(&store()).await;
    }

    #[tokio::test]
    async fn test_ids_not_reused() {
        contract::ids_are_not_reused(&store()).await;
    }

    #[tokio::test]
    async fn test_tasks_survive_reopen() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("tasks.db");

        let created = {
            let store = SqliteTaskStore::open(&path).unwrap();
            let task = store
                .create_task(NewTask::new("Buy milk", "2%"))
                .await
                .unwrap();
            store
                .update_task(task.id, TaskPatch::completed(true))
                .await
                .unwrap()
        };

        let reopened = SqliteTaskStore::open(&path).unwrap();
        assert_eq!(reopened.list_tasks().await.unwrap(), vec![created]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_writers_get_distinct_ids() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_task(NewTask::new(format!("task {}", i), "x"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(store.list_tasks().await.unwrap().len(), 16);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_queries_leave_the_executor_free() {
        let store = Arc::new(store());

        // A ticker on the same single-threaded runtime keeps making progress
        // while the database lock is held by a blocking query.
        let held = Arc::clone(&store.conn);
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let blocker = std::thread::spawn(move || {
            let _guard = held.lock().unwrap();
            locked_tx.send(()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(500));
        });
        locked_rx.recv().unwrap();

        let list = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.list_tasks().await }
        });
        let ticks = tokio::spawn(async {
            let mut ticks = 0;
            for _ in 0..5 {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                ticks += 1;
            }
            ticks
        });

        assert_eq!(ticks.await.unwrap(), 5);
        assert!(!list.is_finished());
        assert!(list.await.unwrap().unwrap().is_empty());
        blocker.join().unwrap();
    }
}
