//! Worker management panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Gauge, Row, Table};
use ratatui::Frame;

use crate::client::WorkerStatus;
use crate::state::{format_timestamp, AppState};
use crate::ui::Theme;

/// Render the worker panel: utilization gauge on top, roster below.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Utilization gauge
            Constraint::Min(3),    // Worker table
        ])
        .split(area);

    render_gauge(frame, chunks[0], state, theme);
    render_roster(frame, chunks[1], state, theme);
}

fn render_gauge(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let stats = state.utilization;
    let label = format!(
        "{}% ({} of {} active workers busy)",
        stats.percentage,
        stats.busy,
        stats.active()
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Utilization")
                .borders(Borders::ALL)
                .style(theme.block_style),
        )
        .gauge_style(theme.gauge_style)
        .percent(u16::from(stats.percentage.min(100)))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let empty = Vec::new();
    let workers = state.workers.value.as_ref().unwrap_or(&empty);

    let header = Row::new(["Name", "Status", "Created", "Heartbeat"]).style(theme.header_style);
    let rows: Vec<Row> = workers
        .iter()
        .map(|worker| {
            let status_label = worker.status.map(|s| s.as_str()).unwrap_or("?");
            Row::new([
                Cell::from(worker.name.clone().unwrap_or_else(|| "?".to_string())),
                Cell::from(Span::styled(status_label, status_style(theme, worker.status))),
                Cell::from(format_timestamp(worker.created_at)),
                Cell::from(format_timestamp(worker.last_heartbeat)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!("Workers ({})", workers.len()))
            .borders(Borders::ALL)
            .style(theme.block_style),
    );

    frame.render_widget(table, area);
}

fn status_style(theme: &Theme, status: Option<WorkerStatus>) -> Style {
    match status {
        Some(WorkerStatus::Idle) => theme.idle_style,
        Some(WorkerStatus::Processing) => theme.busy_style,
        Some(WorkerStatus::Stopped) => theme.stopped_style,
        None => theme.label_style,
    }
}
