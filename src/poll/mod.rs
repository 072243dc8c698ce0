//! Polling synchronizer.
//!
//! Each remote resource (tasks, workers, engine status) gets its own
//! [`Poller`]: a tokio task that fetches the full collection immediately on
//! activation and then on a fixed cadence, publishing wholesale-replaced
//! snapshots over a watch channel. Pollers suspend entirely while the
//! visibility source reports hidden, resume with an immediate fetch, keep
//! stale data across failed fetches, and retry on the next tick without
//! backoff. The three loops share no state and do not coordinate.

pub mod visibility;

pub use visibility::{Visibility, VisibilitySource};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::ApiError;

/// Default poll cadence for every resource kind.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// The latest known state of a polled resource.
///
/// `value` survives failed fetches (stale-but-available); `error` holds the
/// most recent failure and is cleared by the next success. `is_loading` is
/// true only until the first fetch completes, successfully or not.
#[derive(Debug, Clone)]
pub struct PollSnapshot<T> {
    pub value: Option<T>,
    pub is_loading: bool,
    pub error: Option<Arc<ApiError>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for PollSnapshot<T> {
    fn default() -> Self {
        Self {
            value: None,
            is_loading: true,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> PollSnapshot<T> {
    /// True when the snapshot may lag the backend because the last fetch
    /// failed.
    pub fn is_stale(&self) -> bool {
        self.error.is_some()
    }
}

/// Cloneable handle for triggering an out-of-band fetch, e.g. right after
/// a mutation to shorten perceived staleness.
#[derive(Debug, Clone)]
pub struct RefetchHandle(Arc<Notify>);

impl RefetchHandle {
    pub fn trigger(&self) {
        self.0.notify_one();
    }
}

/// Handle to one polling loop.
///
/// Owns the loop's lifetime: dropping the poller (or calling
/// [`dispose`](Self::dispose)) cancels the spawned task. An in-flight
/// request is not aborted, but its result dies with the loop.
pub struct Poller<T> {
    snapshot_rx: watch::Receiver<PollSnapshot<T>>,
    refetch: RefetchHandle,
    cancel: CancellationToken,
}

impl<T> Poller<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn a polling loop around a zero-argument fetch operation.
    pub fn spawn<F, Fut>(
        fetch: F,
        interval: Duration,
        visibility: watch::Receiver<Visibility>,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (snapshot_tx, snapshot_rx) = watch::channel(PollSnapshot::default());
        let refetch = RefetchHandle(Arc::new(Notify::new()));
        let cancel = CancellationToken::new();

        tokio::spawn(run_loop(
            fetch,
            interval,
            visibility,
            snapshot_tx,
            Arc::clone(&refetch.0),
            cancel.clone(),
        ));

        Self {
            snapshot_rx,
            refetch,
            cancel,
        }
    }

    /// Clone of the latest snapshot.
    pub fn snapshot(&self) -> PollSnapshot<T> {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot<T>> {
        self.snapshot_rx.clone()
    }

    /// Trigger one immediate fetch. The interval timer is left untouched,
    /// so the next scheduled tick still happens when it would have.
    pub fn refetch(&self) {
        self.refetch.trigger();
    }

    /// Handle for triggering refetches from spawned mutation tasks.
    pub fn refetch_handle(&self) -> RefetchHandle {
        self.refetch.clone()
    }

    /// Stop the polling loop. Idempotent; also runs on drop.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop<T, F, Fut>(
    mut fetch: F,
    interval: Duration,
    mut visibility: watch::Receiver<Visibility>,
    snapshot_tx: watch::Sender<PollSnapshot<T>>,
    refetch: Arc<Notify>,
    cancel: CancellationToken,
) where
    T: Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if visibility.borrow().is_hidden() {
            // Suspended: no fetches, no queued ticks. Missed intervals are
            // simply gone.
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = visibility.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if visibility.borrow().is_hidden() {
                        continue;
                    }
                    // Visible again: fetch now, then restart the cadence
                    // from this instant.
                    apply_fetch(&mut fetch, &snapshot_tx).await;
                    ticker.reset();
                }
            }
            continue;
        }

        // The first tick of a fresh interval completes immediately, which
        // doubles as the activation fetch.
        tokio::select! {
            _ = cancel.cancelled() => return,
            changed = visibility.changed() => {
                if changed.is_err() {
                    return;
                }
                // Hidden is handled at the top of the loop.
            }
            _ = refetch.notified() => {
                apply_fetch(&mut fetch, &snapshot_tx).await;
            }
            _ = ticker.tick() => {
                apply_fetch(&mut fetch, &snapshot_tx).await;
            }
        }
    }
}

/// Run one fetch and fold the result into the snapshot. Fetches are
/// awaited inline, so ticks never overlap; a slow response is applied
/// whenever it arrives (last write wins, by arrival order).
async fn apply_fetch<T, F, Fut>(fetch: &mut F, snapshot_tx: &watch::Sender<PollSnapshot<T>>)
where
    T: Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match fetch().await {
        Ok(value) => {
            snapshot_tx.send_replace(PollSnapshot {
                value: Some(value),
                is_loading: false,
                error: None,
                updated_at: Some(Utc::now()),
            });
        }
        Err(err) => {
            tracing::warn!(error = %err, "poll fetch failed, keeping previous snapshot");
            snapshot_tx.send_modify(|snapshot| {
                snapshot.is_loading = false;
                snapshot.error = Some(Arc::new(err));
            });
        }
    }
}
