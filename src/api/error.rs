//! Error responses for the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::storage::StoreError;

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Body failed to parse or validate.
    InvalidTaskData,
    /// `:id` path segment is not an integer.
    InvalidTaskId,
    TaskNotFound,
    /// Any other storage fault. Not recovered from.
    Internal(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTaskData | Self::InvalidTaskId => StatusCode::BAD_REQUEST,
            Self::TaskNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidTaskData => "Invalid task data",
            Self::InvalidTaskId => "Invalid task ID",
            Self::TaskNotFound => "Task not found",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::TaskNotFound,
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!(error = %err, "Task store failure");
        }
        let body = ErrorResponse {
            message: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_status() {
        let not_found: ApiError = StoreError::NotFound(7).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), "Task not found");

        let internal: ApiError =
            StoreError::Database(rusqlite::Error::InvalidQuery).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let poisoned: ApiError = StoreError::Poisoned.into();
        assert_eq!(poisoned.message(), "Internal Server Error");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ApiError::InvalidTaskData.message(), "Invalid task data");
        assert_eq!(ApiError::InvalidTaskId.message(), "Invalid task ID");
        assert_eq!(ApiError::InvalidTaskId.status(), StatusCode::BAD_REQUEST);
    }
}
