//! Notices feed, the terminal stand-in for toast notifications.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::ops::NoticeLevel;
use crate::state::AppState;
use crate::ui::Theme;

/// Render the most recent notices, newest at the bottom.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .notices
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|notice| {
            let style = match notice.level {
                NoticeLevel::Success => theme.notice_success,
                NoticeLevel::Info => theme.notice_info,
                NoticeLevel::Error => theme.notice_error,
            };
            ListItem::new(Line::from(vec![
                Span::styled(notice.at.format("%H:%M:%S ").to_string(), theme.label_style),
                Span::styled(format!("{}: ", notice.title), style),
                Span::styled(notice.body.clone(), theme.normal_text),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Notices")
            .borders(Borders::ALL)
            .style(theme.block_style),
    );
    frame.render_widget(list, area);
}
