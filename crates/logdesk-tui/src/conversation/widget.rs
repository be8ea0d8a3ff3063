//! Transcript pane widget.
//!
//! ```text
//! ┌─ Conversation ──────────────────────┐
//! │ You                                  │
//! │   查詢今天的 404 錯誤                │
//! │                                      │
//! │ Agent                                │
//! │   今天共有 12 筆 404 紀錄...         │
//! └──────────────────────────────────────┘
//! ```

use logdesk_engine::{ChatMessage, ROLE_ASSISTANT, ROLE_USER};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;

/// Indentation of message bodies under their speaker label.
const BODY_INDENT: &str = "  ";

/// Display label for a message role.
pub fn role_label(role: &str) -> &str {
    match role {
        ROLE_USER => "You",
        ROLE_ASSISTANT | "ai" => "Agent",
        other => other,
    }
}

/// Scrollable view of the conversation.
pub struct TranscriptPane<'a> {
    messages: &'a [ChatMessage],
    theme: &'a Theme,
    scroll_from_bottom: usize,
    placeholder: &'a str,
}

impl<'a> TranscriptPane<'a> {
    /// Create a new transcript pane.
    pub fn new(messages: &'a [ChatMessage], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll_from_bottom: 0,
            placeholder: "Ask about your access logs...",
        }
    }

    /// Lines scrolled up from the newest message.
    #[must_use]
    pub fn scroll(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    /// Build all display lines for the given text width.
    pub fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
        let mut lines = Vec::new();

        for (idx, message) in self.messages.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }

            lines.push(Line::from(Span::styled(
                role_label(&message.role).to_string(),
                Style::default()
                    .fg(self.theme.role_color(&message.role))
                    .add_modifier(Modifier::BOLD),
            )));

            for raw in message.text().lines() {
                if raw.is_empty() {
                    lines.push(Line::default());
                    continue;
                }
                for wrapped in textwrap::wrap(raw, body_width) {
                    lines.push(Line::from(Span::styled(
                        format!("{BODY_INDENT}{wrapped}"),
                        Style::default().fg(self.theme.text),
                    )));
                }
            }
        }

        lines
    }
}

impl Widget for TranscriptPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.messages.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                self.placeholder,
                Style::default().fg(self.theme.muted),
            )))
            .render(inner, buf);
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let height = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        let start = max_scroll.saturating_sub(self.scroll_from_bottom.min(max_scroll));
        let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();

        Paragraph::new(visible).render(inner, buf);
    }
}
