//! Task submission, single and bulk.

use rand::Rng;

use crate::client::{ApiClient, ApiError, Complexity, Task, TaskSubmission};

use super::Notices;

/// Bounds on the bulk submission count.
pub const BULK_MIN: usize = 1;
pub const BULK_MAX: usize = 100;

/// The slice of the API that submission needs; lets tests drive the
/// orchestrator with a fake.
pub trait SubmitApi {
    async fn submit_task(&self, request: &TaskSubmission) -> Result<Task, ApiError>;
}

impl SubmitApi for ApiClient {
    async fn submit_task(&self, request: &TaskSubmission) -> Result<Task, ApiError> {
        ApiClient::submit_task(self, request).await
    }
}

/// Submit one task. Returns whether it succeeded, so callers can decide
/// follow-up (e.g. not clearing a form on failure). `silent` suppresses
/// both the success and failure notices; bulk submission uses it so a
/// hundred tasks do not produce a hundred toasts.
pub async fn submit_task(
    api: &impl SubmitApi,
    notices: &Notices,
    request: TaskSubmission,
    silent: bool,
) -> bool {
    match api.submit_task(&request).await {
        Ok(task) => {
            let name = task.name.unwrap_or(request.name);
            tracing::debug!(task = %name, "task submitted");
            if !silent {
                notices.success(
                    "Task created",
                    format!("\"{name}\" has been added to the queue"),
                );
            }
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "task submission failed");
            if !silent {
                notices.error("Failed to create task", err.message());
            }
            false
        }
    }
}

/// Aggregate result of a bulk submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Submit `count` random tasks and report an aggregate summary.
///
/// Submissions run strictly one at a time. Sequential bulk creation is a
/// backpressure policy, not an oversight: it keeps a hundred inserts from
/// landing on the backend at once, while bulk worker scaling stays
/// concurrent. A failed submission does not abort the rest.
pub async fn bulk_submit(api: &impl SubmitApi, notices: &Notices, count: usize) -> BulkReport {
    if !(BULK_MIN..=BULK_MAX).contains(&count) {
        notices.error(
            "Invalid count",
            format!("Enter a number between {BULK_MIN} and {BULK_MAX}"),
        );
        return BulkReport::default();
    }

    let mut report = BulkReport::default();
    for _ in 0..count {
        if submit_task(api, notices, random_submission(), true).await {
            report.succeeded += 1;
        } else {
            report.failed += 1;
        }
    }

    if report.failed > 0 {
        notices.error(
            "Bulk creation completed with errors",
            format!("Created {} tasks, {} failed", report.succeeded, report.failed),
        );
    } else {
        notices.success(
            "Bulk creation complete",
            format!("Successfully created {} tasks", report.succeeded),
        );
    }
    report
}

const TASK_NAMES: &[&str] = &[
    "Process Invoice",
    "Generate Report",
    "Validate Data",
    "Send Notification",
    "Update Database",
    "Calculate Statistics",
    "Export Data",
    "Import Records",
    "Sync Inventory",
    "Analyze Metrics",
    "Backup Files",
    "Compress Images",
    "Transform Data",
    "Index Documents",
    "Clean Cache",
    "Render Video",
    "Encode Media",
    "Parse Logs",
    "Aggregate Stats",
    "Build Package",
];

/// A plausible random task for demo and bulk flows.
pub fn random_submission() -> TaskSubmission {
    let mut rng = rand::thread_rng();
    let name = TASK_NAMES[rng.gen_range(0..TASK_NAMES.len())];
    let complexity = match rng.gen_range(0..3) {
        0 => Complexity::Low,
        1 => Complexity::Medium,
        _ => Complexity::High,
    };
    TaskSubmission {
        name: format!("{name} #{}", rng.gen_range(0..1000)),
        complexity,
    }
}
