//! logdesk-tui: Terminal UI for the web-log agent client
//!
//! This crate provides the terminal front-end:
//! - Transcript pane, input bar and status bar
//! - Key and paste handling feeding the conversation controller
//! - A single background request task per submission

mod app;
mod conversation;
mod event;
mod layout;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use logdesk_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logdesk_engine::{Config, PendingQuery, RequestClient, SubmitOutcome};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::theme::Theme;

/// Tick rate of the event handler; also bounds how late a reply is noticed.
const TICK_RATE_MS: u64 = 100;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(RequestClient::from_config(config)?);
    let session_label = match client.session_id() {
        Ok(token) => format!("session {token}"),
        Err(e) => {
            warn!(error = %e, "Session unavailable");
            "session unavailable".to_string()
        }
    };
    info!(base_url = client.base_url(), %session_label, "Starting TUI");

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, session_label);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events, &client).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: &Arc<RequestClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    let theme = Theme::default();
    let mut in_flight: Option<JoinHandle<SubmitOutcome>> = None;

    loop {
        terminal.draw(|frame| layout::render_app(frame, app, &theme, Instant::now()))?;

        if let Some(event) = events.next().await {
            let now = Instant::now();
            match event {
                Event::Key(key) => {
                    let action = key_to_action(key);
                    if let Some(query) = app.handle_action(action, now) {
                        in_flight = Some(spawn_query(Arc::clone(client), query));
                    }
                }
                Event::Paste(text) => app.handle_paste(&text, now),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if in_flight.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = in_flight.take() {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => SubmitOutcome::Failure(e.to_string()),
                };
                app.complete(outcome);
            }
        }

        if app.should_quit {
            if let Some(handle) = in_flight.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

fn spawn_query(client: Arc<RequestClient>, query: PendingQuery) -> JoinHandle<SubmitOutcome> {
    tokio::spawn(async move {
        let result = client.query_log(&query.input).await;
        if let Err(ref e) = result {
            warn!(error = %e, "Query failed");
        }
        SubmitOutcome::from_result(result)
    })
}
