//! Application state and update logic for the logdesk TUI.

use crate::event::Action;
use crate::widgets::StatusBarContent;
use crossterm::event::{MouseEvent, MouseEventKind};
use logdesk_engine::{Config, Conversation, PendingQuery, Phase, SubmitOutcome};
use std::time::Instant;

/// Lines moved by PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Transcript, input box and submit guard.
    pub conversation: Conversation,

    /// Backend base URL, for display.
    pub base_url: String,

    /// Session description, for display.
    pub session_label: String,

    /// Lines scrolled up from the bottom of the transcript.
    pub transcript_scroll: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create a new app instance.
    pub fn new(config: &Config, session_label: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::from_config(config),
            base_url: config.base_url.clone(),
            session_label: session_label.into(),
            transcript_scroll: 0,
            tick: 0,
            should_quit: false,
        }
    }

    /// Handle an action at `now`.
    ///
    /// Returns the query to send when the action started a submission.
    pub fn handle_action(&mut self, action: Action, now: Instant) -> Option<PendingQuery> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Send => return self.start(|c| c.press_enter(now)),
            Action::Submit => return self.start(Conversation::submit),
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_LINES),
            Action::PageDown => self.scroll_down(PAGE_LINES),
            edit => self.edit(edit),
        }
        None
    }

    fn edit(&mut self, action: Action) {
        let input = self.conversation.input_mut();
        match action {
            Action::Newline => input.insert('\n'),
            Action::Insert(ch) => input.insert(ch),
            Action::Backspace => input.backspace(),
            Action::Delete => input.delete(),
            Action::Left => input.move_left(),
            Action::Right => input.move_right(),
            Action::Home => input.move_home(),
            Action::End => input.move_end(),
            _ => {}
        }
    }

    fn start(
        &mut self,
        accept: impl FnOnce(&mut Conversation) -> Option<PendingQuery>,
    ) -> Option<PendingQuery> {
        let pending = accept(&mut self.conversation)?;
        self.transcript_scroll = 0;
        Some(pending)
    }

    /// Handle a bracketed paste arriving at `now`.
    ///
    /// Terminals commit IME and clipboard text in one burst, so a paste is
    /// treated as a composition: Enter stays blocked for the debounce window.
    pub fn handle_paste(&mut self, text: &str, now: Instant) {
        self.conversation.composition_start();
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.conversation.input_mut().insert_str(&text);
        self.conversation.composition_end(now);
    }

    /// Handle mouse wheel scrolling.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_up(1),
            MouseEventKind::ScrollDown => self.scroll_down(1),
            _ => {}
        }
    }

    /// Apply the result of the in-flight request.
    pub fn complete(&mut self, outcome: SubmitOutcome) {
        self.conversation.finish(outcome);
        self.transcript_scroll = 0;
    }

    /// Advance the animation tick.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Content for the status bar at `now`.
    pub fn status_content(&self, now: Instant) -> StatusBarContent {
        let phase = self.conversation.phase(now);
        let hint = match phase {
            Phase::Idle => "Enter to send",
            Phase::Composing | Phase::DebouncingAfterComposition => "composing",
            Phase::Submitting => "waiting for reply",
        };
        StatusBarContent {
            phase,
            endpoint: self.base_url.clone(),
            session: Some(self.session_label.clone()),
            hint: Some(hint.into()),
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }
}
