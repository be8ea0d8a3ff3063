//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen for text entry.
//! Supports multi-line input with Ctrl+J for newlines.

use logdesk_engine::InputBuffer;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// Prompt drawn before the first input line.
const PROMPT: &str = "> ";

/// Spinner frames for the waiting indicator.
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a InputBuffer,
    theme: &'a Theme,
    focused: bool,
    loading: bool,
    tick: usize,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a InputBuffer, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            focused: false,
            loading: false,
            tick: 0,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set loading state; `tick` drives the spinner.
    #[must_use]
    pub fn loading(mut self, loading: bool, tick: usize) -> Self {
        self.loading = loading;
        self.tick = tick;
        self
    }

    /// Line index and display column of the cursor, prefix included.
    fn cursor_line_col(&self) -> (usize, usize) {
        let before = self.input.before_cursor();
        let line = before.matches('\n').count();
        let current = before.rsplit('\n').next().unwrap_or_default();
        (line, PROMPT.width() + current.width())
    }

    /// Vertical and horizontal scroll that keep the cursor inside `inner`.
    ///
    /// The last column stays free for the cursor itself.
    fn scroll_offsets(&self, inner: Rect) -> (usize, usize) {
        let (line, col) = self.cursor_line_col();
        let rows = usize::from(inner.height).saturating_sub(1);
        let cols = usize::from(inner.width).saturating_sub(1);
        (line.saturating_sub(rows), col.saturating_sub(cols))
    }

    /// Where the terminal cursor belongs when this bar is drawn in `area`.
    ///
    /// Placing the real cursor there lets the terminal anchor its IME
    /// candidate window next to the text being composed.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        if self.loading || !self.focused || area.width < 3 || area.height < 3 {
            return None;
        }
        let inner = inner_area(area);
        let (line, col) = self.cursor_line_col();
        let (rows, cols) = self.scroll_offsets(inner);

        let x = inner.x.saturating_add(to_u16(col - cols));
        let y = inner.y.saturating_add(to_u16(line - rows));
        Some(Position::new(
            x.min(inner.right().saturating_sub(1)),
            y.min(inner.bottom().saturating_sub(1)),
        ))
    }

    fn build_input_lines(&self) -> Vec<Line<'static>> {
        let content = self.input.content();
        if content.is_empty() && !self.focused {
            return vec![Line::from(format!("{PROMPT}_"))];
        }

        content
            .split('\n')
            .enumerate()
            .map(|(idx, text)| {
                let prefix = if idx == 0 { PROMPT } else { "  " };
                Line::from(format!("{prefix}{text}"))
            })
            .collect()
    }
}

fn inner_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = if self.loading {
            let frame = SPINNER[self.tick % SPINNER.len()];
            Paragraph::new(format!("{frame} Waiting for agent..."))
                .block(block)
                .style(Style::default().fg(self.theme.muted))
        } else {
            let (rows, cols) = self.scroll_offsets(inner_area(area));
            Paragraph::new(self.build_input_lines())
                .block(block)
                .style(Style::default().fg(self.theme.text))
                .scroll((to_u16(rows), to_u16(cols)))
        };

        paragraph.render(area, buf);
    }
}
