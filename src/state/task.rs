//! Task grouping.
//!
//! Pure projection of a fetched task list into the four board columns.
//! Recomputed from scratch on every snapshot; never partially updated.

use crate::client::{Task, TaskStatus};

/// Tasks partitioned by status, each bucket newest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTasks {
    pub pending: Vec<Task>,
    pub processing: Vec<Task>,
    pub completed: Vec<Task>,
    pub failed: Vec<Task>,
}

impl GroupedTasks {
    pub fn bucket(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::Processing => &self.processing,
            TaskStatus::Completed => &self.completed,
            TaskStatus::Failed => &self.failed,
        }
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.bucket(status).len()
    }

    /// Total across all buckets. May be less than the fetched list length
    /// when tasks carried an unrecognized status.
    pub fn total(&self) -> usize {
        TaskStatus::ALL.iter().map(|status| self.count(*status)).sum()
    }
}

/// Partition tasks into status buckets, newest first within each bucket.
///
/// Tasks with a missing or unrecognized status are dropped from every
/// bucket rather than shown in a catch-all column. A missing creation
/// time sorts as the epoch, oldest. The sort is stable, so ties keep
/// fetch order.
pub fn group_by_status(tasks: &[Task]) -> GroupedTasks {
    let mut grouped = GroupedTasks::default();

    for task in tasks {
        match task.status {
            Some(TaskStatus::Pending) => grouped.pending.push(task.clone()),
            Some(TaskStatus::Processing) => grouped.processing.push(task.clone()),
            Some(TaskStatus::Completed) => grouped.completed.push(task.clone()),
            Some(TaskStatus::Failed) => grouped.failed.push(task.clone()),
            None => {}
        }
    }

    for bucket in [
        &mut grouped.pending,
        &mut grouped.processing,
        &mut grouped.completed,
        &mut grouped.failed,
    ] {
        bucket.sort_by_key(|task| {
            std::cmp::Reverse(task.created_at.map(|at| at.timestamp_millis()).unwrap_or(0))
        });
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(id: i64, status: Option<TaskStatus>, created_secs: Option<i64>) -> Task {
        Task {
            id: Some(id),
            status,
            created_at: created_secs.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
            ..Task::default()
        }
    }

    fn ids(bucket: &[Task]) -> Vec<i64> {
        bucket.iter().filter_map(|task| task.id).collect()
    }

    #[test]
    fn partitions_every_recognized_task_into_exactly_one_bucket() {
        let tasks = vec![
            task(1, Some(TaskStatus::Pending), Some(100)),
            task(2, Some(TaskStatus::Processing), Some(200)),
            task(3, Some(TaskStatus::Completed), Some(300)),
            task(4, Some(TaskStatus::Failed), Some(400)),
            task(5, Some(TaskStatus::Pending), Some(500)),
        ];

        let grouped = group_by_status(&tasks);
        assert_eq!(grouped.count(TaskStatus::Pending), 2);
        assert_eq!(grouped.count(TaskStatus::Processing), 1);
        assert_eq!(grouped.count(TaskStatus::Completed), 1);
        assert_eq!(grouped.count(TaskStatus::Failed), 1);
        assert_eq!(grouped.total(), tasks.len());
    }

    #[test]
    fn drops_tasks_with_missing_status_from_all_buckets() {
        let tasks = vec![
            task(1, Some(TaskStatus::Pending), Some(100)),
            task(2, None, Some(200)),
            task(3, None, None),
        ];

        let grouped = group_by_status(&tasks);
        assert_eq!(grouped.total(), 1);
        assert_eq!(ids(&grouped.pending), vec![1]);
    }

    #[test]
    fn buckets_are_sorted_newest_first() {
        let tasks = vec![
            task(1, Some(TaskStatus::Completed), Some(100)),
            task(2, Some(TaskStatus::Completed), Some(300)),
            task(3, Some(TaskStatus::Completed), Some(200)),
        ];

        let grouped = group_by_status(&tasks);
        assert_eq!(ids(&grouped.completed), vec![2, 3, 1]);

        for pair in grouped.completed.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn missing_creation_time_sorts_as_oldest() {
        let tasks = vec![
            task(1, Some(TaskStatus::Pending), None),
            task(2, Some(TaskStatus::Pending), Some(50)),
        ];

        let grouped = group_by_status(&tasks);
        assert_eq!(ids(&grouped.pending), vec![2, 1]);
    }

    #[test]
    fn equal_timestamps_keep_fetch_order() {
        let tasks = vec![
            task(10, Some(TaskStatus::Failed), Some(100)),
            task(11, Some(TaskStatus::Failed), Some(100)),
            task(12, Some(TaskStatus::Failed), Some(100)),
        ];

        let grouped = group_by_status(&tasks);
        assert_eq!(ids(&grouped.failed), vec![10, 11, 12]);
    }

    #[test]
    fn empty_input_yields_empty_buckets() {
        let grouped = group_by_status(&[]);
        assert_eq!(grouped, GroupedTasks::default());
    }
}
