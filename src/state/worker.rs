//! Worker utilization metrics.

use crate::client::{Worker, WorkerStatus};

/// Derived counts over the current worker snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utilization {
    pub total: usize,
    pub busy: usize,
    pub idle: usize,
    pub stopped: usize,
    /// `round(100 * busy / total)`, 0 when there are no workers.
    pub percentage: u8,
}

impl Utilization {
    /// Workers that count toward scaling decisions. Stopped workers are
    /// excluded.
    pub fn active(&self) -> usize {
        self.total - self.stopped
    }
}

/// Count workers by status and derive the busy percentage.
pub fn utilization(workers: &[Worker]) -> Utilization {
    let total = workers.len();
    let count = |status: WorkerStatus| {
        workers
            .iter()
            .filter(|worker| worker.status == Some(status))
            .count()
    };
    let busy = count(WorkerStatus::Processing);
    let idle = count(WorkerStatus::Idle);
    let stopped = count(WorkerStatus::Stopped);
    let percentage = if total == 0 {
        0
    } else {
        ((busy as f64 / total as f64) * 100.0).round() as u8
    };

    Utilization {
        total,
        busy,
        idle,
        stopped,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn worker(status: WorkerStatus) -> Worker {
        Worker {
            status: Some(status),
            ..Worker::default()
        }
    }

    #[test]
    fn counts_sum_to_total() {
        let workers = vec![
            worker(WorkerStatus::Processing),
            worker(WorkerStatus::Processing),
            worker(WorkerStatus::Idle),
            worker(WorkerStatus::Stopped),
        ];

        let stats = utilization(&workers);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.busy + stats.idle + stats.stopped, stats.total);
        assert_eq!(stats.active(), 3);
    }

    #[test]
    fn percentage_is_rounded() {
        // 1 busy of 3 -> 33.33 -> 33; 2 of 3 -> 66.67 -> 67.
        let one_of_three = vec![
            worker(WorkerStatus::Processing),
            worker(WorkerStatus::Idle),
            worker(WorkerStatus::Idle),
        ];
        assert_eq!(utilization(&one_of_three).percentage, 33);

        let two_of_three = vec![
            worker(WorkerStatus::Processing),
            worker(WorkerStatus::Processing),
            worker(WorkerStatus::Idle),
        ];
        assert_eq!(utilization(&two_of_three).percentage, 67);
    }

    #[test]
    fn empty_roster_is_zero_percent() {
        let stats = utilization(&[]);
        assert_eq!(stats, Utilization::default());
    }

    #[test]
    fn stopped_workers_do_not_count_as_active() {
        let workers = vec![worker(WorkerStatus::Stopped), worker(WorkerStatus::Stopped)];
        let stats = utilization(&workers);
        assert_eq!(stats.active(), 0);
        assert_eq!(stats.percentage, 0);
    }
}
