//! HTTP client for the task API.

use reqwest::{Response, StatusCode};
use thiserror::Error;

use crate::api::ErrorResponse;
use crate::task::{NewTask, Task, TaskId, TaskPatch, ValidationError};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Input failed local validation and was not sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Server answered 400.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Server answered 404.
    #[error("{0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: StatusCode, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Typed client for `/api/tasks`.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/api/tasks/{}", self.base_url, id)
    }

    pub async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        let resp = self.http.get(self.tasks_url()).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn create_task(&self, input: &NewTask) -> ClientResult<Task> {
        input.validate()?;
        let resp = self.http.post(self.tasks_url()).json(input).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ClientResult<Task> {
        patch.validate()?;
        let resp = self.http.patch(self.task_url(id)).json(patch).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn set_completed(&self, id: TaskId, completed: bool) -> ClientResult<Task> {
        self.update_task(id, &TaskPatch::completed(completed)).await
    }

    pub async fn delete_task(&self, id: TaskId) -> ClientResult<()> {
        let resp = self.http.delete(self.task_url(id)).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Pass through 2xx responses; turn everything else into a `ClientError`.
async fn check(resp: Response) -> ClientResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.message)
        .unwrap_or(text);

    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::Rejected(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::UnexpectedStatus { status, message },
    })
}
