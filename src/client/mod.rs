//! Client side of the task API.
//!
//! - `TaskClient`: typed HTTP calls against `/api/tasks`
//! - `TaskBoard`: cached task list with filter state; every successful
//!   mutation invalidates the cache and notifies listeners, and the next
//!   read refetches

mod api;
mod board;

pub use api::{ClientError, ClientResult, TaskClient};
pub use board::{InvalidationListener, Mutation, TaskBoard};
