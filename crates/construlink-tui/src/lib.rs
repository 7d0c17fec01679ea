//! Terminal front-end for the ConstruLink daily report.
//!
//! Renders [`UiState`] from `construlink` with ratatui + crossterm on a
//! dedicated OS thread, while the async runtime serves PDF exports through
//! [`construlink::ui::drive_exports`].
//!
//! # Quick start
//!
//! ```ignore
//! use construlink_tui::{TuiConfig, spawn_tui};
//! use construlink::ui::UiState;
//! use std::sync::{Arc, Mutex};
//!
//! let ui_state = Arc::new(Mutex::new(UiState::new(artifacts)));
//! let handle = spawn_tui(ui_state.clone(), TuiConfig::default());
//! construlink::ui::drive_exports(ui_state, &client).await;
//! handle.join().unwrap();
//! ```

use std::io;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use construlink::ui::tracing::LogBuffer;
use construlink::ui::{UiState, request_quit};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use ratatui::prelude::*;

mod app;
mod fields;
mod input;
mod render;

pub use render::{format_progress, log_level_style};

use app::App;
use input::handle_key_event;
use render::render;

/// Configuration for the TUI.
#[derive(Default)]
pub struct TuiConfig {
    /// Log buffer from the tracing layer, drained once per frame into
    /// `UiState::logs`.
    pub log_buffer: Option<LogBuffer>,
}

/// Spawn the TUI on a dedicated OS thread.
///
/// When the TUI exits for any reason, `quit_requested` is set so the export
/// driver stops too.
pub fn spawn_tui(state: Arc<Mutex<UiState>>, config: TuiConfig) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_tui(Arc::clone(&state), &config) {
            eprintln!("TUI error: {e}");
        }
        request_quit(&state);
    })
}

/// Run the TUI event loop (blocking). Returns when the user quits.
pub fn run_tui(state: Arc<Mutex<UiState>>, config: &TuiConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new();

    let result = event_loop(&mut terminal, &state, &mut app, config);

    // Restore the terminal even if the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &Arc<Mutex<UiState>>,
    app: &mut App,
    config: &TuiConfig,
) -> io::Result<()> {
    loop {
        let stop = state
            .lock()
            .map(|s| s.quit_requested || !s.running)
            .unwrap_or(true);
        if app.should_quit || stop {
            request_quit(state);
            return Ok(());
        }

        if let Some(ref log_buf) = config.log_buffer {
            log_buf.flush_into(state);
        }

        terminal.draw(|frame| render(frame, state, app))?;

        // 100ms poll keeps the export status fresh without busy-looping.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key_event(key, app, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_config_default_has_no_log_buffer() {
        assert!(TuiConfig::default().log_buffer.is_none());
    }

    #[test]
    fn app_defaults() {
        let app = App::new();
        assert!(!app.should_quit);
        assert!(!app.show_logs);
        assert!(app.status_message.is_none());
        assert_eq!(app.form_cursor, 0);
        assert_eq!(app.log_scroll, 0);
    }
}
