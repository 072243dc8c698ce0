//! Queuedash - Terminal dashboard for a distributed task queue
//!
//! Polls the queue's HTTP API and renders a live task board, worker
//! pool view and engine controls in the terminal.

use std::io;

use color_eyre::Result;
use queuedash::app::{App, AppConfig};
use queuedash::event::EventHandler;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    setup_logging()?;

    setup_terminal()?;

    let config = AppConfig::from_env();
    let mut app = App::new(config);
    let mut events = EventHandler::new();

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let result = app.run(&mut terminal, &mut events).await;

    restore_terminal()?;
    result
}

/// Log to a file so tracing output does not fight the TUI for stdout.
fn setup_logging() -> Result<()> {
    let file = std::fs::File::create("queuedash.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableFocusChange
    )?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    crossterm::execute!(
        io::stdout(),
        crossterm::event::DisableFocusChange,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}
