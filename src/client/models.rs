//! Wire types for the task queue engine API.
//!
//! These mirror the backend's JSON contract exactly; the dashboard never
//! owns these entities, it only caches the latest fetched snapshot. Most
//! fields are optional on the wire, so they are optional here too.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Task complexity, implicitly related to how long a task takes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "LOW",
            Complexity::Medium => "MEDIUM",
            Complexity::High => "HIGH",
        }
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Processing,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Processing => "PROCESSING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        }
    }
}

/// Worker lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerStatus {
    Idle,
    Processing,
    Stopped,
}

impl WorkerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerStatus::Idle => "IDLE",
            WorkerStatus::Processing => "PROCESSING",
            WorkerStatus::Stopped => "STOPPED",
        }
    }
}

/// Engine state as reported by `/api/engine/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    Stopped,
    Paused,
    Running,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Stopped => "STOPPED",
            EngineState::Paused => "PAUSED",
            EngineState::Running => "RUNNING",
        }
    }
}

/// A task as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_enum")]
    pub complexity: Option<Complexity>,
    /// A status value outside the known vocabulary deserializes to `None`;
    /// the board drops such tasks from every column rather than failing
    /// the whole list.
    #[serde(deserialize_with = "lenient_enum")]
    pub status: Option<TaskStatus>,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub processing_started_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_worker_id: Option<i64>,
    pub assigned_worker_name: Option<String>,
}

/// A worker as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Worker {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_enum")]
    pub status: Option<WorkerStatus>,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub last_heartbeat: Option<DateTime<Utc>>,
}

impl Worker {
    /// A worker counts as active unless the backend says it is stopped.
    pub fn is_active(&self) -> bool {
        self.status != Some(WorkerStatus::Stopped)
    }
}

/// Engine status snapshot. Singleton, no identity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineStatus {
    #[serde(deserialize_with = "lenient_enum")]
    pub state: Option<EngineState>,
    pub message: Option<String>,
    pub active_worker_count: Option<i32>,
}

/// Spring-style page envelope for paginated list responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: Option<i64>,
    pub total_pages: Option<i32>,
    pub number: Option<i32>,
    pub size: Option<i32>,
    pub number_of_elements: Option<i32>,
    pub first: Option<bool>,
    pub last: Option<bool>,
    pub empty: Option<bool>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: None,
            total_pages: None,
            number: None,
            size: None,
            number_of_elements: None,
            first: None,
            last: None,
            empty: None,
        }
    }
}

/// Request body for `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub name: String,
    pub complexity: Complexity,
}

/// Request body for `POST /api/workers`. A missing name is auto-generated
/// by the backend (`worker-1`, `worker-2`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response of `DELETE /api/database/clear`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClearOutcome {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub tasks_deleted: Option<i64>,
    pub workers_deleted: Option<i64>,
}

/// Query parameters for `GET /api/tasks`.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub complexity: Option<Complexity>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `property,(asc|desc)` entries; the backend defaults to
    /// `createdAt,DESC` when none are sent.
    pub sort: Vec<String>,
}

impl TaskQuery {
    /// The query the dashboard polls with: everything in one page.
    pub fn for_board() -> Self {
        Self {
            size: Some(1000),
            ..Self::default()
        }
    }
}

/// Parse a backend timestamp. The contract says ISO-8601 UTC, but some
/// fields arrive without an offset (`2025-12-04T14:30:00`), so fall back
/// to a naive datetime interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| Utc.from_utc_datetime(&naive)))
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserialize an optional enum, mapping values outside the known
/// vocabulary to `None` instead of failing the surrounding document.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_deserializes_from_page_envelope() {
        let json = r#"{
            "content": [{
                "id": 7,
                "name": "Process user data",
                "complexity": "HIGH",
                "status": "COMPLETED",
                "createdAt": "2025-10-08T14:30:00",
                "processingStartedAt": "2025-10-08T14:30:30",
                "completedAt": "2025-10-08T14:35:00Z",
                "assignedWorkerId": 1,
                "assignedWorkerName": "worker-1"
            }],
            "totalElements": 1,
            "number": 0
        }"#;

        let page: Page<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 1);
        let task = &page.content[0];
        assert_eq!(task.status, Some(TaskStatus::Completed));
        assert_eq!(task.complexity, Some(Complexity::High));
        assert_eq!(task.assigned_worker_name.as_deref(), Some("worker-1"));
        // Offset-less and Zulu timestamps both land in UTC.
        let created = task.created_at.unwrap();
        let completed = task.completed_at.unwrap();
        assert_eq!((completed - created).num_seconds(), 300);
    }

    #[test]
    fn unknown_status_becomes_none_without_failing_the_list() {
        let json = r#"[
            {"id": 1, "status": "PENDING"},
            {"id": 2, "status": "ARCHIVED"},
            {"id": 3}
        ]"#;

        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].status, Some(TaskStatus::Pending));
        assert_eq!(tasks[1].status, None);
        assert_eq!(tasks[2].status, None);
    }

    #[test]
    fn engine_status_tolerates_missing_fields() {
        let status: EngineStatus = serde_json::from_str(r#"{"state": "RUNNING"}"#).unwrap();
        assert_eq!(status.state, Some(EngineState::Running));
        assert_eq!(status.active_worker_count, None);
    }

    #[test]
    fn worker_create_omits_absent_name() {
        let body = serde_json::to_string(&WorkerCreate::default()).unwrap();
        assert_eq!(body, "{}");

        let named = WorkerCreate {
            name: Some("worker-9".into()),
        };
        assert_eq!(serde_json::to_string(&named).unwrap(), r#"{"name":"worker-9"}"#);
    }
}
