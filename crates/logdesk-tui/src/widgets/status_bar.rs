//! Status bar widget for the top of the TUI.
//!
//! Format: `● phase │ endpoint │ session │ → hint`

use logdesk_engine::Phase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// Status bar content.
#[derive(Debug, Clone)]
pub struct StatusBarContent {
    /// Conversation phase.
    pub phase: Phase,
    /// Backend base URL.
    pub endpoint: String,
    /// Session description.
    pub session: Option<String>,
    /// Next action hint.
    pub hint: Option<String>,
}

/// Status bar widget.
pub struct StatusBar<'a> {
    content: &'a StatusBarContent,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(content: &'a StatusBarContent, theme: &'a Theme) -> Self {
        Self { content, theme }
    }

    fn phase_style(&self) -> Style {
        let color = match self.content.phase {
            Phase::Idle => self.theme.primary,
            Phase::Composing | Phase::DebouncingAfterComposition => self.theme.secondary,
            Phase::Submitting => self.theme.warning,
        };
        Style::default().fg(color)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = || Span::styled(" │ ", Style::default().fg(self.theme.muted));

        let mut spans = vec![
            Span::styled("● ", self.phase_style()),
            Span::styled(self.content.phase.to_string(), Style::default().fg(self.theme.text)),
            separator(),
            Span::styled(
                self.content.endpoint.as_str(),
                Style::default().fg(self.theme.subtext),
            ),
        ];

        if let Some(ref session) = self.content.session {
            spans.push(separator());
            spans.push(Span::styled(session.as_str(), Style::default().fg(self.theme.subtext)));
        }

        if let Some(ref hint) = self.content.hint {
            spans.push(separator());
            spans.push(Span::styled(
                format!("→ {hint}"),
                Style::default().fg(self.theme.secondary),
            ));
        }

        let line = Line::from(spans);
        let paragraph = Paragraph::new(line).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}
