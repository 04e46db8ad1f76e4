//! Server configuration loaded from environment variables.
//!
//! - `HOST` / `PORT`: listen address (default `127.0.0.1:5000`)
//! - `WORKING_DIR`: base directory for on-disk state (default: current dir)
//! - `TASKBOARD_STORAGE`: `sqlite` (default) or `memory`
//! - `DATABASE_PATH`: SQLite file (default `{WORKING_DIR}/.taskboard/tasks.db`)

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;

use crate::storage::{MemoryTaskStore, SharedTaskStore, SqliteTaskStore};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Which `TaskStore` backend to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown storage backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub working_dir: PathBuf,
    pub storage: StorageBackend,
    pub database_path: PathBuf,
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let working_dir = match lookup("WORKING_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };

        let storage = match lookup("TASKBOARD_STORAGE") {
            Some(raw) => raw
                .parse::<StorageBackend>()
                .context("Invalid TASKBOARD_STORAGE")?,
            None => StorageBackend::default(),
        };

        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| working_dir.join(".taskboard").join("tasks.db"));

        Ok(Self {
            host,
            port,
            working_dir,
            storage,
            database_path,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the configured task store.
    pub fn open_store(&self) -> anyhow::Result<SharedTaskStore> {
        let store: SharedTaskStore = match self.storage {
            StorageBackend::Sqlite => Arc::new(SqliteTaskStore::open(&self.database_path)?),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory task storage; tasks will not survive restart");
                Arc::new(MemoryTaskStore::new())
            }
        };
        Ok(store)
    }
}
