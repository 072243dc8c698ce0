//! Terminal event handling.
//!
//! Collects crossterm events (keyboard, resize, focus) into a structured
//! stream the application loop consumes. Focus events matter here: they
//! drive the visibility source that suspends the pollers while the
//! terminal is unobserved.

pub mod handler;

pub use handler::EventHandler;

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent};
use eyre::Result;

/// Default event polling interval.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);

/// Application events.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(crossterm::event::KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Terminal gained focus
    FocusGained,
    /// Terminal lost focus
    FocusLost,
    /// Regular tick event for redraws
    Tick,
}

/// Event dispatcher that collects terminal events.
pub struct EventDispatcher {
    /// Polling interval
    tick_rate: Duration,
}

impl EventDispatcher {
    /// Create a new event dispatcher with the default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }

    /// Set a custom tick rate.
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Wait for and return the next event.
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) => Ok(Event::Key(key)),
                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
                CrosstermEvent::FocusGained => Ok(Event::FocusGained),
                CrosstermEvent::FocusLost => Ok(Event::FocusLost),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
