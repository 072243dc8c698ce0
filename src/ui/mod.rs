//! UI components for the queue dashboard.
//!
//! The controller is a small state machine over two views (task board and
//! worker panel) plus a help overlay and a numeric prompt for the bulk
//! operations. Rendering reads exclusively from [`AppState`]; every user
//! intent is returned to the application as an [`UpdateKind`] so the UI
//! never talks to the network itself.

mod board;
mod help;
mod notices;
pub mod theme;
mod workers;

pub use theme::Theme;

use crossterm::event::{KeyCode, KeyEvent};
use itertools::Itertools;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::client::{Complexity, EngineState, TaskSubmission};
use crate::state::AppState;

/// The result of handling user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Submit one random task
    SubmitTask,
    /// Submit a task with a user-chosen name and complexity
    SubmitNamedTask(TaskSubmission),
    /// Submit this many random tasks
    BulkSubmit(usize),
    /// Add one worker
    AddWorker,
    /// Stop the first active worker
    RemoveWorker,
    /// Scale the worker pool to this target
    ScaleWorkers(usize),
    /// Engine lifecycle transitions
    StartEngine,
    PauseEngine,
    ResumeEngine,
    StopEngine,
    /// Wipe all tasks and workers
    ClearDatabase,
    /// Refetch every resource now
    Refresh,
    /// No action needed
    Other,
}

/// Available views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Kanban-style task board
    Board,
    /// Worker management panel
    Workers,
}

/// What a prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    /// Task name, with complexity cycled alongside
    NewTask,
    BulkTasks,
    ScaleTarget,
}

#[derive(Debug, Clone)]
struct Prompt {
    kind: PromptKind,
    buffer: String,
    /// Only meaningful for [`PromptKind::NewTask`].
    complexity: Complexity,
}

impl Prompt {
    fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::NewTask => "New task name (Tab cycles complexity, empty = random)",
            PromptKind::BulkTasks => "Create how many tasks? (1-100)",
            PromptKind::ScaleTarget => "Scale workers to how many? (0-10)",
        }
    }

    fn is_text(&self) -> bool {
        self.kind == PromptKind::NewTask
    }
}

/// Main UI controller.
pub struct Ui {
    view: ViewState,
    show_help: bool,
    prompt: Option<Prompt>,
    theme: Theme,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            view: ViewState::Board,
            show_help: false,
            prompt: None,
            theme: Theme::default(),
        }
    }

    pub fn current_view(&self) -> ViewState {
        self.view
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Handle keyboard input, returning what the application should do.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> UpdateKind {
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        if self.show_help {
            match key.code {
                KeyCode::Char('q') => return UpdateKind::Quit,
                _ => {
                    self.show_help = false;
                    return UpdateKind::Other;
                }
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => UpdateKind::Quit,
            KeyCode::Char('?') | KeyCode::F(1) => UpdateKind::ToggleHelp,
            KeyCode::Tab => {
                self.view = match self.view {
                    ViewState::Board => ViewState::Workers,
                    ViewState::Workers => ViewState::Board,
                };
                UpdateKind::Other
            }
            KeyCode::Char('t') => {
                self.open_prompt(PromptKind::NewTask);
                UpdateKind::Other
            }
            KeyCode::Char('b') => {
                self.open_prompt(PromptKind::BulkTasks);
                UpdateKind::Other
            }
            KeyCode::Char('+') | KeyCode::Char('a') => UpdateKind::AddWorker,
            KeyCode::Char('-') | KeyCode::Char('x') => UpdateKind::RemoveWorker,
            KeyCode::Char('w') => {
                self.open_prompt(PromptKind::ScaleTarget);
                UpdateKind::Other
            }
            KeyCode::Char('e') => UpdateKind::StartEngine,
            KeyCode::Char('p') => UpdateKind::PauseEngine,
            KeyCode::Char('u') => UpdateKind::ResumeEngine,
            KeyCode::Char('s') => UpdateKind::StopEngine,
            KeyCode::Char('c') => UpdateKind::ClearDatabase,
            KeyCode::Char('r') => UpdateKind::Refresh,
            _ => UpdateKind::Other,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> UpdateKind {
        let is_text = self.prompt.as_ref().is_some_and(Prompt::is_text);
        match key.code {
            KeyCode::Char(c) if is_text || c.is_ascii_digit() => {
                if let Some(prompt) = self.prompt.as_mut() {
                    let cap = if is_text { 48 } else { 4 };
                    if prompt.buffer.len() < cap {
                        prompt.buffer.push(c);
                    }
                }
                UpdateKind::Other
            }
            KeyCode::Tab if is_text => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.complexity = next_complexity(prompt.complexity);
                }
                UpdateKind::Other
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.buffer.pop();
                }
                UpdateKind::Other
            }
            KeyCode::Enter => match self.prompt.take() {
                Some(prompt) => submit_prompt(prompt),
                None => UpdateKind::Other,
            },
            KeyCode::Esc => {
                self.prompt = None;
                UpdateKind::Other
            }
            _ => UpdateKind::Other,
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            buffer: String::new(),
            complexity: Complexity::Medium,
        });
    }

    /// Render the current view.
    pub fn render(&self, frame: &mut Frame, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Engine header
                Constraint::Min(5),    // Main view
                Constraint::Length(6), // Notices
                Constraint::Length(1), // Key bar
            ])
            .split(frame.size());

        self.render_header(frame, chunks[0], state);
        match self.view {
            ViewState::Board => board::render(frame, chunks[1], state, &self.theme),
            ViewState::Workers => workers::render(frame, chunks[1], state, &self.theme),
        }
        notices::render(frame, chunks[2], state, &self.theme);
        self.render_key_bar(frame, chunks[3]);

        if self.show_help {
            help::render(frame, frame.size(), &self.theme);
        }
        if let Some(prompt) = &self.prompt {
            self.render_prompt(frame, frame.size(), prompt);
        }
    }

    /// Engine state, worker utilization and data freshness in one line.
    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &self.theme;
        let engine = state.engine.value.as_ref();
        let engine_state = engine.and_then(|status| status.state);
        let engine_style = match engine_state {
            Some(EngineState::Running) => theme.engine_running,
            Some(EngineState::Paused) => theme.engine_paused,
            _ => theme.engine_stopped,
        };
        let engine_label = engine_state.map(|s| s.as_str()).unwrap_or("UNKNOWN");

        let stats = state.utilization;
        let summary = [
            format!("{} workers", stats.total),
            format!("{} busy", stats.busy),
            format!("{} idle", stats.idle),
            format!("{} stopped", stats.stopped),
            format!("{}% utilized", stats.percentage),
        ]
        .iter()
        .join("  ·  ");

        let mut spans = vec![
            Span::styled("Engine: ", theme.label_style),
            Span::styled(engine_label, engine_style),
            Span::raw("   "),
            Span::styled(summary, theme.value_style),
        ];
        if let Some(message) = engine.and_then(|status| status.message.as_deref()) {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(message.to_string(), theme.label_style));
        }
        if state.is_loading() {
            spans.push(Span::styled("   loading…", theme.loading_style));
        } else if state.is_stale() {
            spans.push(Span::styled("   STALE", theme.stale_style));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title("queuedash")
                .borders(Borders::ALL)
                .style(theme.block_style),
        );
        frame.render_widget(header, area);
    }

    fn render_key_bar(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let keys = [
            ("Tab", "view"),
            ("t", "task"),
            ("b", "bulk"),
            ("+/-", "worker"),
            ("w", "scale"),
            ("e/p/u/s", "engine"),
            ("c", "clear"),
            ("r", "refresh"),
            ("?", "help"),
            ("q", "quit"),
        ];
        let spans: Vec<Span> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, theme.key_style),
                    Span::styled(format!(" {label}  "), theme.label_style),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, prompt: &Prompt) {
        let popup = help::centered_rect(40, 20, area);
        frame.render_widget(ratatui::widgets::Clear, popup);
        let mut spans = vec![
            Span::styled("> ", self.theme.key_style),
            Span::styled(prompt.buffer.clone(), self.theme.value_style),
        ];
        if prompt.is_text() {
            spans.push(Span::styled(
                format!("  [{}]", prompt.complexity.as_str()),
                self.theme.label_style,
            ));
        }
        let body = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(prompt.title())
                .borders(Borders::ALL)
                .style(self.theme.block_style),
        );
        frame.render_widget(body, popup);
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a completed prompt into an application update.
fn submit_prompt(prompt: Prompt) -> UpdateKind {
    match prompt.kind {
        PromptKind::NewTask => {
            let name = prompt.buffer.trim().to_string();
            if name.is_empty() {
                UpdateKind::SubmitTask
            } else {
                UpdateKind::SubmitNamedTask(TaskSubmission {
                    name,
                    complexity: prompt.complexity,
                })
            }
        }
        PromptKind::BulkTasks => match prompt.buffer.parse() {
            Ok(count) => UpdateKind::BulkSubmit(count),
            Err(_) => UpdateKind::Other,
        },
        PromptKind::ScaleTarget => match prompt.buffer.parse() {
            Ok(count) => UpdateKind::ScaleWorkers(count),
            Err(_) => UpdateKind::Other,
        },
    }
}

fn next_complexity(complexity: Complexity) -> Complexity {
    match complexity {
        Complexity::Low => Complexity::Medium,
        Complexity::Medium => Complexity::High,
        Complexity::High => Complexity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn prompt_collects_digits_and_submits_on_enter() {
        let mut ui = Ui::new();
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('b'))), UpdateKind::Other);
        ui.handle_key_event(key(KeyCode::Char('2')));
        ui.handle_key_event(key(KeyCode::Char('5')));
        assert_eq!(
            ui.handle_key_event(key(KeyCode::Enter)),
            UpdateKind::BulkSubmit(25)
        );
        assert!(ui.prompt.is_none());
    }

    #[test]
    fn prompt_escape_cancels_without_action() {
        let mut ui = Ui::new();
        ui.handle_key_event(key(KeyCode::Char('w')));
        ui.handle_key_event(key(KeyCode::Char('7')));
        assert_eq!(ui.handle_key_event(key(KeyCode::Esc)), UpdateKind::Other);
        // Back to normal key handling.
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('q'))), UpdateKind::Quit);
    }

    #[test]
    fn empty_prompt_enter_is_a_no_op() {
        let mut ui = Ui::new();
        ui.handle_key_event(key(KeyCode::Char('w')));
        assert_eq!(ui.handle_key_event(key(KeyCode::Enter)), UpdateKind::Other);
    }

    #[test]
    fn task_prompt_collects_name_and_cycles_complexity() {
        let mut ui = Ui::new();
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('t'))), UpdateKind::Other);
        for c in "Ship release".chars() {
            ui.handle_key_event(key(KeyCode::Char(c)));
        }
        // Medium -> High.
        ui.handle_key_event(key(KeyCode::Tab));
        assert_eq!(
            ui.handle_key_event(key(KeyCode::Enter)),
            UpdateKind::SubmitNamedTask(TaskSubmission {
                name: "Ship release".into(),
                complexity: Complexity::High,
            })
        );
        assert!(ui.prompt.is_none());
    }

    #[test]
    fn empty_task_prompt_falls_back_to_a_random_submission() {
        let mut ui = Ui::new();
        ui.handle_key_event(key(KeyCode::Char('t')));
        assert_eq!(ui.handle_key_event(key(KeyCode::Enter)), UpdateKind::SubmitTask);
    }

    #[test]
    fn tab_toggles_between_views() {
        let mut ui = Ui::new();
        assert_eq!(ui.current_view(), ViewState::Board);
        ui.handle_key_event(key(KeyCode::Tab));
        assert_eq!(ui.current_view(), ViewState::Workers);
        ui.handle_key_event(key(KeyCode::Tab));
        assert_eq!(ui.current_view(), ViewState::Board);
    }

    #[test]
    fn engine_keys_map_to_transitions() {
        let mut ui = Ui::new();
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('e'))), UpdateKind::StartEngine);
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('p'))), UpdateKind::PauseEngine);
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('u'))), UpdateKind::ResumeEngine);
        assert_eq!(ui.handle_key_event(key(KeyCode::Char('s'))), UpdateKind::StopEngine);
    }
}
