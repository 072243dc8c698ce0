//! Mutation orchestrators.
//!
//! These issue one or more write requests through the API client,
//! aggregate success/failure, and report outcomes to the user as
//! [`Notice`]s over a channel (the terminal equivalent of toast
//! notifications). Reads are never updated directly: every mutation relies
//! on the next poll tick, or an explicit refetch, to observe its effect.

pub mod engine;
pub mod scaling;
pub mod submission;

pub use engine::EngineApi;
pub use scaling::ScaleApi;
pub use submission::{BulkReport, SubmitApi};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A non-blocking, user-facing notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(level: NoticeLevel, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
            at: Utc::now(),
        }
    }
}

/// Cloneable sending side of the notice channel.
#[derive(Debug, Clone)]
pub struct Notices {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notices {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, title: impl Into<String>, body: impl Into<String>) {
        self.send(Notice::new(NoticeLevel::Success, title, body));
    }

    pub fn info(&self, title: impl Into<String>, body: impl Into<String>) {
        self.send(Notice::new(NoticeLevel::Info, title, body));
    }

    pub fn error(&self, title: impl Into<String>, body: impl Into<String>) {
        self.send(Notice::new(NoticeLevel::Error, title, body));
    }

    fn send(&self, notice: Notice) {
        // A closed receiver means the app is shutting down; nothing to do.
        let _ = self.tx.send(notice);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Drain whatever notices are currently queued.
    pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }
}
