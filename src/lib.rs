//! Queuedash library
//!
//! Core components for the task queue monitoring dashboard.

pub mod app;
pub mod client;
pub mod event;
pub mod ops;
pub mod poll;
pub mod state;
pub mod ui;
