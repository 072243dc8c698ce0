//! Help overlay showing keyboard shortcuts.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::ui::Theme;

/// Render the help overlay.
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(60, 70, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("queuedash Help")
        .borders(Borders::ALL)
        .style(theme.block_style);

    let entry = |key: &'static str, label: &'static str| {
        Line::from(vec![
            Span::styled(key, theme.key_style),
            Span::raw(" - "),
            Span::raw(label),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Views",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        entry("Tab", "Switch between task board and worker panel"),
        entry("r", "Refetch all resources now"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Tasks",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        entry("t", "Submit a task (prompted; Tab cycles complexity, empty name = random)"),
        entry("b", "Bulk-create tasks (prompted for count, 1-100)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Workers",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        entry("+ / a", "Add one worker"),
        entry("- / x", "Stop the first active worker"),
        entry("w", "Scale workers to a target count (prompted, 0-10)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Engine",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        entry("e", "Start the engine"),
        entry("p", "Pause the engine"),
        entry("u", "Resume the engine"),
        entry("s", "Stop the engine"),
        entry("c", "Clear the database (engine must be stopped)"),
        Line::from(""),
        entry("?", "Toggle this help screen"),
        entry("q", "Quit"),
    ];

    let help_widget = Paragraph::new(help_text)
        .block(help_block)
        .style(theme.normal_text)
        .alignment(Alignment::Left);

    frame.render_widget(help_widget, popup_area);
}

/// Helper to create a centered rect using percentages of the given area.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    let popup_x = (r.width.saturating_sub(popup_width)) / 2;
    let popup_y = (r.height.saturating_sub(popup_height)) / 2;

    Rect {
        x: r.x + popup_x,
        y: r.y + popup_y,
        width: popup_width,
        height: popup_height,
    }
}
