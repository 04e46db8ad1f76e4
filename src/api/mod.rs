//! HTTP API for task management.

pub mod error;
pub mod routes;
mod tasks;

pub use error::{ApiError, ErrorResponse};
pub use routes::{router, serve, AppState};
