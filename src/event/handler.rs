//! Asynchronous terminal event stream.
//!
//! A dedicated task runs the blocking crossterm dispatcher and forwards
//! events over a channel; the application loop consumes them as a
//! `futures::Stream`.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;

use super::{Event, EventDispatcher};

/// Stream of terminal events backed by a dispatcher task.
pub struct EventHandler {
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Spawn the dispatcher task and return the consuming handle.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || {
            let dispatcher = EventDispatcher::new();
            loop {
                match dispatcher.next() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        std::thread::sleep(Duration::from_millis(10));
                    }
                }
            }
        });

        Self { event_rx: rx }
    }

    fn poll_event(&mut self, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        Pin::new(&mut self.event_rx).poll_recv(cx)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for EventHandler {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.poll_event(cx)
    }
}
