//! UI theme definition.

use ratatui::style::{Color, Modifier, Style};

/// Theme for the application UI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Basic styles
    pub normal_text: Style,
    pub block_style: Style,
    pub header_style: Style,
    pub label_style: Style,
    pub value_style: Style,

    // Key styles
    pub key_style: Style,

    // Status styles
    pub stale_style: Style,
    pub loading_style: Style,

    // Task status styles
    pub pending_style: Style,
    pub processing_style: Style,
    pub completed_style: Style,
    pub failed_style: Style,

    // Worker status styles
    pub idle_style: Style,
    pub busy_style: Style,
    pub stopped_style: Style,

    // Engine state styles
    pub engine_running: Style,
    pub engine_paused: Style,
    pub engine_stopped: Style,

    // Notice styles
    pub notice_success: Style,
    pub notice_info: Style,
    pub notice_error: Style,

    // Gauge style
    pub gauge_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Basic styles
            normal_text: Style::default().fg(Color::White),
            block_style: Style::default(),
            header_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            label_style: Style::default().fg(Color::Gray),
            value_style: Style::default().fg(Color::White),

            // Key styles
            key_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),

            // Status styles
            stale_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            loading_style: Style::default().fg(Color::Gray),

            // Task status styles
            pending_style: Style::default().fg(Color::Blue),
            processing_style: Style::default().fg(Color::Yellow),
            completed_style: Style::default().fg(Color::Green),
            failed_style: Style::default().fg(Color::Red),

            // Worker status styles
            idle_style: Style::default().fg(Color::Cyan),
            busy_style: Style::default().fg(Color::Yellow),
            stopped_style: Style::default().fg(Color::DarkGray),

            // Engine state styles
            engine_running: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            engine_paused: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            engine_stopped: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            // Notice styles
            notice_success: Style::default().fg(Color::Green),
            notice_info: Style::default().fg(Color::Cyan),
            notice_error: Style::default().fg(Color::Red),

            // Gauge style
            gauge_style: Style::default().fg(Color::Green),
        }
    }
}
