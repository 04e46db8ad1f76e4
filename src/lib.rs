//! # taskboard
//!
//! A single-table task tracker.
//!
//! This library provides:
//! - An HTTP API for listing, creating, updating and deleting tasks
//! - SQLite and in-memory task stores behind one `TaskStore` trait
//! - A typed client with a cached, filterable task list
//!
//! ## Request Flow
//!
//! ```text
//!   HTTP request ──▶ api (validate) ──▶ TaskStore ──▶ tasks table
//!                         │
//!                         ▼
//!              200/204 JSON or {message} error
//! ```
//!
//! ## Modules
//! - `task`: Task record, inputs, validation, filtering
//! - `storage`: `TaskStore` trait and backends
//! - `api`: axum router and handlers
//! - `client`: `TaskClient` and `TaskBoard`
//! - `config`: environment configuration

pub mod api;
pub mod client;
pub mod config;
pub mod storage;
pub mod task;

pub use config::Config;
pub use storage::{SharedTaskStore, StoreError, TaskStore};
pub use task::{NewTask, Task, TaskId, TaskPatch};
