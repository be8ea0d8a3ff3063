//! Screen layout: status bar, transcript, input bar.
//!
//! ```text
//! ● idle │ http://127.0.0.1:8000 │ session 1700… │ → Enter to send
//! ┌─ Conversation ───────────────────────────────────────────────┐
//! │ ...                                                          │
//! └──────────────────────────────────────────────────────────────┘
//! ┌──────────────────────────────────────────────────────────────┐
//! │ > _                                                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
    Frame,
};
use std::time::Instant;

use crate::app::App;
use crate::conversation::TranscriptPane;
use crate::theme::Theme;
use crate::widgets::{InputBar, StatusBar};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 40;

/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 10;

/// Input bar height including borders.
const INPUT_HEIGHT: u16 = 5;

/// Render the whole screen.
pub fn render_app(frame: &mut Frame<'_>, app: &App, theme: &Theme, now: Instant) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area, theme);
        return;
    }

    let [status_area, transcript_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(INPUT_HEIGHT),
    ])
    .areas(area);

    let status = app.status_content(now);
    frame.render_widget(StatusBar::new(&status, theme), status_area);

    let transcript = TranscriptPane::new(app.conversation.transcript(), theme)
        .scroll(app.transcript_scroll);
    frame.render_widget(transcript, transcript_area);

    let input = InputBar::new(app.conversation.input(), theme)
        .focused(true)
        .loading(app.conversation.is_busy(), app.tick);
    if let Some(position) = input.cursor_position(input_area) {
        frame.set_cursor_position(position);
    }
    frame.render_widget(input, input_area);
}

fn render_too_small(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let message = format!("Terminal too small, resize to at least {MIN_WIDTH}x{MIN_HEIGHT}");
    Paragraph::new(message)
        .style(Style::default().fg(theme.error))
        .render(area, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{buffer_to_string, create_test_terminal, create_test_terminal_sized};
    use logdesk_engine::{ChatMessage, Config, SubmitOutcome};

    fn draw(app: &App, width: u16, height: u16) -> String {
        let theme = Theme::default();
        let mut terminal = create_test_terminal_sized(width, height);
        terminal
            .draw(|frame| render_app(frame, app, &theme, Instant::now()))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn test_full_screen_renders() {
        let mut app = App::new(&Config::default(), "session 1700000000000");
        app.conversation.input_mut().insert_str("hello");
        app.handle_action(Action::Send, Instant::now()).unwrap();
        app.complete(SubmitOutcome::Success(vec![
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi there"),
        ]));

        let theme = Theme::default();
        let mut terminal = create_test_terminal();
        terminal
            .draw(|frame| render_app(frame, &app, &theme, Instant::now()))
            .unwrap();
        let text = buffer_to_string(terminal.backend().buffer());

        assert!(text.contains("idle"));
        assert!(text.contains("session 1700000000000"));
        assert!(text.contains("Conversation"));
        assert!(text.contains("hi there"));
        assert!(text.contains("> "));
    }

    #[test]
    fn test_waiting_indicator_while_busy() {
        let mut app = App::new(&Config::default(), "session");
        app.conversation.input_mut().insert_str("hello");
        app.handle_action(Action::Send, Instant::now()).unwrap();

        let text = draw(&app, 80, 24);
        assert!(text.contains("Waiting for agent"));
        assert!(text.contains("submitting"));
    }

    #[test]
    fn test_too_small_terminal() {
        let app = App::new(&Config::default(), "session");
        let text = draw(&app, 30, 8);
        assert!(text.contains("too small"));
    }
}
