//! Application state.
//!
//! [`AppState`] is the read-only snapshot the UI renders from: the latest
//! poller snapshots plus the derived views recomputed whenever a snapshot
//! is replaced. All mutation happens on the main loop; the pollers publish
//! into watch channels and the loop copies from them here.

mod task;
mod time;
mod worker;

pub use task::{group_by_status, GroupedTasks};
pub use time::{format_duration, format_timestamp, UNAVAILABLE};
pub use worker::{utilization, Utilization};

use std::collections::VecDeque;

use crate::client::{EngineStatus, Task, Worker};
use crate::ops::Notice;
use crate::poll::PollSnapshot;

/// How many notices the feed keeps around.
const NOTICE_CAPACITY: usize = 50;

/// Everything the presentation layer reads.
pub struct AppState {
    pub tasks: PollSnapshot<Vec<Task>>,
    pub grouped: GroupedTasks,
    pub workers: PollSnapshot<Vec<Worker>>,
    pub utilization: Utilization,
    pub engine: PollSnapshot<EngineStatus>,
    pub notices: VecDeque<Notice>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tasks: PollSnapshot::default(),
            grouped: GroupedTasks::default(),
            workers: PollSnapshot::default(),
            utilization: Utilization::default(),
            engine: PollSnapshot::default(),
            notices: VecDeque::new(),
        }
    }

    /// Replace the task snapshot and recompute the board grouping.
    pub fn apply_tasks(&mut self, snapshot: PollSnapshot<Vec<Task>>) {
        self.grouped = group_by_status(snapshot.value.as_deref().unwrap_or(&[]));
        self.tasks = snapshot;
    }

    /// Replace the worker snapshot and recompute utilization.
    pub fn apply_workers(&mut self, snapshot: PollSnapshot<Vec<Worker>>) {
        self.utilization = utilization(snapshot.value.as_deref().unwrap_or(&[]));
        self.workers = snapshot;
    }

    pub fn apply_engine(&mut self, snapshot: PollSnapshot<EngineStatus>) {
        self.engine = snapshot;
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() == NOTICE_CAPACITY {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// First worker the backend considers active, used by the single
    /// remove-one control.
    pub fn first_active_worker(&self) -> Option<&Worker> {
        self.workers
            .value
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find(|worker| worker.is_active())
    }

    /// True when any poller is serving stale data because its last fetch
    /// failed.
    pub fn is_stale(&self) -> bool {
        self.tasks.is_stale() || self.workers.is_stale() || self.engine.is_stale()
    }

    /// True until every poller has completed its first fetch.
    pub fn is_loading(&self) -> bool {
        self.tasks.is_loading || self.workers.is_loading || self.engine.is_loading
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{TaskStatus, WorkerStatus};
    use crate::ops::{NoticeLevel, Notices};
    use pretty_assertions::assert_eq;

    #[test]
    fn applying_tasks_recomputes_grouping() {
        let mut state = AppState::new();
        let tasks = vec![
            Task {
                id: Some(1),
                status: Some(TaskStatus::Pending),
                ..Task::default()
            },
            Task {
                id: Some(2),
                status: Some(TaskStatus::Completed),
                ..Task::default()
            },
        ];
        state.apply_tasks(PollSnapshot {
            value: Some(tasks),
            is_loading: false,
            error: None,
            updated_at: None,
        });

        assert_eq!(state.grouped.count(TaskStatus::Pending), 1);
        assert_eq!(state.grouped.count(TaskStatus::Completed), 1);
        // Workers and engine have not loaded yet, so the app still is.
        assert!(!state.tasks.is_loading);
        assert!(state.is_loading());
    }

    #[test]
    fn first_active_worker_skips_stopped_ones() {
        let mut state = AppState::new();
        let workers = vec![
            Worker {
                id: Some(1),
                status: Some(WorkerStatus::Stopped),
                ..Worker::default()
            },
            Worker {
                id: Some(2),
                status: Some(WorkerStatus::Idle),
                ..Worker::default()
            },
        ];
        state.apply_workers(PollSnapshot {
            value: Some(workers),
            is_loading: false,
            error: None,
            updated_at: None,
        });

        assert_eq!(state.first_active_worker().and_then(|w| w.id), Some(2));
        assert_eq!(state.utilization.active(), 1);
    }

    #[test]
    fn notice_feed_is_bounded() {
        let mut state = AppState::new();
        let (notices, mut rx) = Notices::channel();
        for i in 0..60 {
            notices.info("note", format!("{i}"));
        }
        while let Ok(notice) = rx.try_recv() {
            state.push_notice(notice);
        }

        assert_eq!(state.notices.len(), NOTICE_CAPACITY);
        assert_eq!(state.notices.back().unwrap().body, "59");
        assert_eq!(state.notices.front().unwrap().level, NoticeLevel::Info);
    }
}
