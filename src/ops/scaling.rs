//! Worker scaling, single-delta and bulk-to-target.

use futures::future;

use crate::client::{ApiClient, ApiError, Worker, WorkerCreate};

use super::Notices;

/// Upper bound on the worker pool. Scale targets beyond it are rejected
/// before any request is issued, and the add-one control refuses at the
/// cap, so a typo in the prompt cannot fan out an arbitrary number of
/// concurrent creates.
pub const MAX_WORKERS: usize = 10;

/// The slice of the API that scaling needs.
pub trait ScaleApi {
    async fn create_worker(&self, request: &WorkerCreate) -> Result<Worker, ApiError>;
    async fn stop_worker(&self, id: i64) -> Result<Worker, ApiError>;
    async fn list_workers(&self) -> Result<Vec<Worker>, ApiError>;
}

impl ScaleApi for ApiClient {
    async fn create_worker(&self, request: &WorkerCreate) -> Result<Worker, ApiError> {
        ApiClient::create_worker(self, request).await
    }

    async fn stop_worker(&self, id: i64) -> Result<Worker, ApiError> {
        ApiClient::stop_worker(self, id).await
    }

    async fn list_workers(&self) -> Result<Vec<Worker>, ApiError> {
        ApiClient::list_workers(self).await
    }
}

/// Add one worker with a backend-generated name.
pub async fn add_worker(api: &impl ScaleApi, notices: &Notices) -> bool {
    match api.create_worker(&WorkerCreate::default()).await {
        Ok(worker) => {
            let name = worker.name.unwrap_or_else(|| "worker".to_string());
            notices.success("Worker added", format!("{name} is now active"));
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to add worker");
            notices.error("Failed to add worker", err.message());
            false
        }
    }
}

/// Stop one worker by id.
pub async fn remove_worker(api: &impl ScaleApi, notices: &Notices, id: i64) -> bool {
    match api.stop_worker(id).await {
        Ok(worker) => {
            let name = worker.name.unwrap_or_else(|| format!("worker {id}"));
            notices.success("Worker removed", format!("{name} has been stopped"));
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, worker_id = id, "failed to remove worker");
            notices.error("Failed to remove worker", err.message());
            false
        }
    }
}

/// Scale the worker pool to `target`, given the currently known active
/// count.
///
/// Additions and removals fan out concurrently, in contrast with bulk
/// task creation which stays sequential; the asymmetry is a load policy.
/// All requests of one call are awaited together. If any fails the whole
/// operation is reported failed, but changes that already landed are not
/// rolled back; the next poll reconciles whatever actually happened.
pub async fn scale_workers(
    api: &impl ScaleApi,
    notices: &Notices,
    target: usize,
    current: usize,
) -> bool {
    if target > MAX_WORKERS {
        notices.error(
            "Invalid target",
            format!("The worker pool is capped at {MAX_WORKERS}"),
        );
        return false;
    }

    if target == current {
        return true;
    }

    if target > current {
        let to_add = target - current;
        let request = WorkerCreate::default();
        let results =
            future::join_all((0..to_add).map(|_| api.create_worker(&request))).await;
        if let Some(err) = first_error(&results) {
            tracing::warn!(error = %err, to_add, "worker scale-up failed");
            notices.error("Failed to scale workers", err.message());
            return false;
        }
        notices.success(
            format!("Added {to_add} worker{}", plural(to_add)),
            format!("Worker count scaled to {target}"),
        );
        true
    } else {
        let to_remove = current - target;
        let workers = match api.list_workers().await {
            Ok(workers) => workers,
            Err(err) => {
                tracing::warn!(error = %err, "worker list fetch failed during scale-down");
                notices.error("Failed to scale workers", err.message());
                return false;
            }
        };

        // Victims are the first N active workers in the order the backend
        // returned them. The contract exposes no sort key here, so which
        // workers stop is only as stable as that ordering; do not invent
        // one.
        let victims: Vec<i64> = workers
            .iter()
            .filter(|worker| worker.is_active())
            .filter_map(|worker| worker.id)
            .take(to_remove)
            .collect();

        let results = future::join_all(victims.iter().map(|&id| api.stop_worker(id))).await;
        if let Some(err) = first_error(&results) {
            tracing::warn!(error = %err, to_remove, "worker scale-down failed");
            notices.error("Failed to scale workers", err.message());
            return false;
        }
        notices.success(
            format!("Removed {to_remove} worker{}", plural(to_remove)),
            format!("Worker count scaled to {target}"),
        );
        true
    }
}

fn first_error<'a>(results: &'a [Result<Worker, ApiError>]) -> Option<&'a ApiError> {
    results.iter().find_map(|result| result.as_ref().err())
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::WorkerStatus;
    use crate::ops::test_support::drain;
    use crate::ops::NoticeLevel;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeApi {
        roster: Vec<Worker>,
        created: AtomicUsize,
        stopped: Mutex<Vec<i64>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_stop_for: Option<i64>,
    }

    impl FakeApi {
        fn with_roster(roster: Vec<Worker>) -> Self {
            Self {
                roster,
                created: AtomicUsize::new(0),
                stopped: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail_stop_for: None,
            }
        }

        async fn track<T>(&self, value: T) -> T {
            let concurrent = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(concurrent, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            value
        }
    }

    impl ScaleApi for FakeApi {
        async fn create_worker(&self, _request: &WorkerCreate) -> Result<Worker, ApiError> {
            let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
            self.track(Ok(Worker {
                id: Some(n as i64),
                name: Some(format!("worker-{n}")),
                status: Some(WorkerStatus::Idle),
                ..Worker::default()
            }))
            .await
        }

        async fn stop_worker(&self, id: i64) -> Result<Worker, ApiError> {
            self.stopped.lock().unwrap().push(id);
            let result = if self.fail_stop_for == Some(id) {
                Err(ApiError::Status {
                    status: 500,
                    message: "stop failed".into(),
                })
            } else {
                Ok(Worker {
                    id: Some(id),
                    status: Some(WorkerStatus::Stopped),
                    ..Worker::default()
                })
            };
            self.track(result).await
        }

        async fn list_workers(&self) -> Result<Vec<Worker>, ApiError> {
            Ok(self.roster.clone())
        }
    }

    fn worker(id: i64, status: WorkerStatus) -> Worker {
        Worker {
            id: Some(id),
            name: Some(format!("worker-{id}")),
            status: Some(status),
            ..Worker::default()
        }
    }

    #[tokio::test]
    async fn scale_up_issues_concurrent_creates() {
        let api = FakeApi::with_roster(vec![]);
        let (notices, mut rx) = Notices::channel();

        assert!(scale_workers(&api, &notices, 5, 2).await);

        assert_eq!(api.created.load(Ordering::SeqCst), 3);
        assert!(api.stopped.lock().unwrap().is_empty());
        // All three creates were in flight together.
        assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 3);

        let sent = drain(&mut rx);
        assert_eq!(sent[0].level, NoticeLevel::Success);
        assert!(sent[0].title.contains("Added 3 workers"));
    }

    #[tokio::test]
    async fn scale_down_stops_first_active_workers_in_list_order() {
        let api = FakeApi::with_roster(vec![
            worker(1, WorkerStatus::Stopped),
            worker(2, WorkerStatus::Idle),
            worker(3, WorkerStatus::Processing),
            worker(4, WorkerStatus::Idle),
            worker(5, WorkerStatus::Idle),
            worker(6, WorkerStatus::Idle),
        ]);
        let (notices, mut rx) = Notices::channel();

        assert!(scale_workers(&api, &notices, 2, 5).await);

        // Stopped worker 1 is skipped; first 3 active in list order go.
        assert_eq!(*api.stopped.lock().unwrap(), vec![2, 3, 4]);
        assert_eq!(api.created.load(Ordering::SeqCst), 0);
        assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 3);

        let sent = drain(&mut rx);
        assert!(sent[0].title.contains("Removed 3 workers"));
    }

    #[tokio::test]
    async fn target_beyond_the_pool_cap_is_rejected_without_requests() {
        let api = FakeApi::with_roster(vec![]);
        let (notices, mut rx) = Notices::channel();

        assert!(!scale_workers(&api, &notices, 9999, 0).await);

        assert_eq!(api.created.load(Ordering::SeqCst), 0);
        assert!(api.stopped.lock().unwrap().is_empty());
        let sent = drain(&mut rx);
        assert_eq!(sent[0].level, NoticeLevel::Error);
        assert!(sent[0].body.contains("capped at 10"));
    }

    #[tokio::test]
    async fn equal_target_is_a_no_op() {
        let api = FakeApi::with_roster(vec![]);
        let (notices, mut rx) = Notices::channel();

        assert!(scale_workers(&api, &notices, 4, 4).await);

        assert_eq!(api.created.load(Ordering::SeqCst), 0);
        assert!(api.stopped.lock().unwrap().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn partial_scale_down_failure_reports_failed_without_rollback() {
        let mut api = FakeApi::with_roster(vec![
            worker(1, WorkerStatus::Idle),
            worker(2, WorkerStatus::Idle),
            worker(3, WorkerStatus::Idle),
        ]);
        api.fail_stop_for = Some(2);
        let (notices, mut rx) = Notices::channel();

        assert!(!scale_workers(&api, &notices, 0, 3).await);

        // All stop requests were still issued; nothing is compensated.
        assert_eq!(*api.stopped.lock().unwrap(), vec![1, 2, 3]);
        let sent = drain(&mut rx);
        assert_eq!(sent[0].level, NoticeLevel::Error);
        assert_eq!(sent[0].body, "stop failed");
    }

    #[tokio::test]
    async fn add_and_remove_single_worker_report_by_name() {
        let api = FakeApi::with_roster(vec![]);
        let (notices, mut rx) = Notices::channel();

        assert!(add_worker(&api, &notices).await);
        assert!(remove_worker(&api, &notices, 1).await);

        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 2);
        assert!(sent[0].body.contains("worker-1 is now active"));
        assert!(sent[1].body.contains("has been stopped"));
    }
}
