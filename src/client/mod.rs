//! Typed HTTP client for the task queue engine.
//!
//! A thin wrapper over reqwest issuing one method per REST endpoint. The
//! engine itself (scheduling, worker lifecycle, task state transitions)
//! lives entirely behind this API; the dashboard only reads snapshots and
//! issues mutations through it. Timeouts are left to reqwest's defaults.

pub mod models;

pub use models::{
    ClearOutcome, Complexity, EngineState, EngineStatus, Page, Task, TaskQuery, TaskStatus,
    TaskSubmission, Worker, WorkerCreate, WorkerStatus,
};

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "QUEUEDASH_API_URL";

/// Default backend address when the environment does not say otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Errors surfaced by the API client.
///
/// Only two kinds exist: the transport failed, or the backend answered
/// with a non-2xx status. Everything else (validation of user input) is
/// handled before a request is ever made.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// Human-readable message, preferring whatever the server said.
    pub fn message(&self) -> String {
        match self {
            ApiError::Transport(err) => err.to_string(),
            ApiError::Status { message, .. } => message.clone(),
        }
    }
}

/// Shape of the backend's JSON error body, when there is one.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the queue engine's REST surface.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client from `QUEUEDASH_API_URL`, defaulting to localhost.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Liveness probe.
    pub async fn health(&self) -> Result<String, ApiError> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(status_error(status.as_u16(), response.text().await.unwrap_or_default()))
        }
    }

    /// List tasks with optional status/complexity filters, pagination and
    /// sort criteria.
    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Page<Task>, ApiError> {
        let mut request = self.http.get(self.url("/api/tasks"));
        if let Some(status) = query.status {
            request = request.query(&[("status", status.as_str())]);
        }
        if let Some(complexity) = query.complexity {
            request = request.query(&[("complexity", complexity.as_str())]);
        }
        if let Some(page) = query.page {
            request = request.query(&[("page", page)]);
        }
        if let Some(size) = query.size {
            request = request.query(&[("size", size)]);
        }
        for sort in &query.sort {
            request = request.query(&[("sort", sort)]);
        }
        decode(request.send().await?).await
    }

    /// Submit one task for execution.
    pub async fn submit_task(&self, request: &TaskSubmission) -> Result<Task, ApiError> {
        decode(
            self.http
                .post(self.url("/api/tasks"))
                .json(request)
                .send()
                .await?,
        )
        .await
    }

    /// Fetch a single task by id.
    pub async fn get_task(&self, id: i64) -> Result<Task, ApiError> {
        decode(self.http.get(self.url(&format!("/api/tasks/{id}"))).send().await?).await
    }

    /// List all workers.
    pub async fn list_workers(&self) -> Result<Vec<Worker>, ApiError> {
        decode(self.http.get(self.url("/api/workers")).send().await?).await
    }

    /// Create a worker; the backend auto-generates a name when absent.
    pub async fn create_worker(&self, request: &WorkerCreate) -> Result<Worker, ApiError> {
        decode(
            self.http
                .post(self.url("/api/workers"))
                .json(request)
                .send()
                .await?,
        )
        .await
    }

    /// Fetch a single worker by id.
    pub async fn get_worker(&self, id: i64) -> Result<Worker, ApiError> {
        decode(self.http.get(self.url(&format!("/api/workers/{id}"))).send().await?).await
    }

    /// Stop a worker (sets its status to STOPPED).
    pub async fn stop_worker(&self, id: i64) -> Result<Worker, ApiError> {
        decode(
            self.http
                .delete(self.url(&format!("/api/workers/{id}")))
                .send()
                .await?,
        )
        .await
    }

    /// Current engine state and active worker count.
    pub async fn engine_status(&self) -> Result<EngineStatus, ApiError> {
        decode(self.http.get(self.url("/api/engine/status")).send().await?).await
    }

    pub async fn start_engine(&self) -> Result<EngineStatus, ApiError> {
        self.engine_transition("start").await
    }

    pub async fn pause_engine(&self) -> Result<EngineStatus, ApiError> {
        self.engine_transition("pause").await
    }

    pub async fn resume_engine(&self) -> Result<EngineStatus, ApiError> {
        self.engine_transition("resume").await
    }

    pub async fn stop_engine(&self) -> Result<EngineStatus, ApiError> {
        self.engine_transition("stop").await
    }

    async fn engine_transition(&self, action: &str) -> Result<EngineStatus, ApiError> {
        decode(
            self.http
                .post(self.url(&format!("/api/engine/{action}")))
                .send()
                .await?,
        )
        .await
    }

    /// Wipe all tasks and workers. The backend rejects this unless the
    /// engine is stopped; that rejection surfaces as an [`ApiError::Status`].
    pub async fn clear_database(&self) -> Result<ClearOutcome, ApiError> {
        decode(
            self.http
                .delete(self.url("/api/database/clear"))
                .send()
                .await?,
        )
        .await
    }
}

/// Decode a JSON response, converting non-2xx statuses into
/// [`ApiError::Status`] with the server-provided message when parseable.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        Err(status_error(status.as_u16(), response.text().await.unwrap_or_default()))
    }
}

fn status_error(status: u16, body: String) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("server returned HTTP {status}"));
    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_error_prefers_server_message() {
        let err = status_error(409, r#"{"message": "Engine must be stopped"}"#.into());
        assert_eq!(err.message(), "Engine must be stopped");
    }

    #[test]
    fn status_error_falls_back_on_unparseable_body() {
        let err = status_error(502, "<html>bad gateway</html>".into());
        assert_eq!(err.message(), "server returned HTTP 502");
    }

    #[test]
    fn url_joins_without_doubled_slash() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/tasks"), "http://localhost:8080/api/tasks");
    }
}
