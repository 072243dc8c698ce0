//! Kanban-style task board.
//!
//! Four columns, one per status, each newest-first. Column contents come
//! straight from the grouped projection in [`AppState`]; nothing is
//! computed here beyond presentation.

use chrono::Utc;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::client::{Task, TaskStatus};
use crate::state::{format_duration, AppState};
use crate::ui::Theme;

/// Render the task board.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    for (index, status) in TaskStatus::ALL.iter().enumerate() {
        render_column(frame, columns[index], state, theme, *status);
    }
}

fn render_column(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme, status: TaskStatus) {
    let tasks = state.grouped.bucket(status);
    let style = status_style(theme, status);

    let title = format!("{} ({})", status.as_str(), tasks.len());
    let block = Block::default()
        .title(Span::styled(title, style))
        .borders(Borders::ALL)
        .style(theme.block_style);

    // Leave room for the borders.
    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| task_item(task, status, theme, style, inner_width))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn task_item<'a>(
    task: &'a Task,
    status: TaskStatus,
    theme: &Theme,
    style: Style,
    width: usize,
) -> ListItem<'a> {
    let name = task.name.as_deref().unwrap_or("(unnamed)");
    let complexity = task
        .complexity
        .map(|c| c.as_str())
        .unwrap_or("?");

    let detail = match status {
        // Terminal states show total time from creation to completion.
        TaskStatus::Completed | TaskStatus::Failed => {
            format_duration(task.created_at, task.completed_at)
        }
        // A processing task shows how long it has been running.
        TaskStatus::Processing => {
            format_duration(task.processing_started_at, Some(Utc::now()))
        }
        TaskStatus::Pending => String::new(),
    };

    let tail = if detail.is_empty() {
        format!(" [{complexity}]")
    } else {
        format!(" [{complexity}] {detail}")
    };
    let name = truncate(name, width.saturating_sub(tail.width() + 1));

    let mut spans = vec![Span::styled(name, theme.normal_text)];
    spans.push(Span::styled(tail, theme.label_style));
    if let Some(worker) = task.assigned_worker_name.as_deref() {
        if status == TaskStatus::Processing {
            spans.push(Span::styled(format!(" @{worker}"), style));
        }
    }

    ListItem::new(Line::from(spans))
}

fn status_style(theme: &Theme, status: TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => theme.pending_style,
        TaskStatus::Processing => theme.processing_style,
        TaskStatus::Completed => theme.completed_style,
        TaskStatus::Failed => theme.failed_style,
    }
}

/// Cut a string down to `max` display columns, appending an ellipsis when
/// something was dropped.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let budget = max.saturating_sub(1);
    for ch in text.chars() {
        if out.width() + ch.to_string().width() > budget {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_preserves_short_strings() {
        assert_eq!(truncate("Process Invoice", 20), "Process Invoice");
    }

    #[test]
    fn truncate_cuts_on_display_width() {
        assert_eq!(truncate("Process Invoice #123", 10), "Process I…");
    }
}
