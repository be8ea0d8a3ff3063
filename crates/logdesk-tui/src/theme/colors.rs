//! Catppuccin Mocha color palette for the TUI.

use logdesk_engine::{ROLE_ASSISTANT, ROLE_USER};
use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub secondary: Color,

    // Semantic
    pub warning: Color,
    pub error: Color,

    // Speaker attribution
    pub user: Color,
    pub assistant: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            // Backgrounds
            base: Color::Rgb(30, 30, 46),    // #1e1e2e
            surface: Color::Rgb(49, 50, 68), // #313244

            // Foregrounds
            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            // Accents
            primary: Color::Rgb(180, 190, 254),   // #b4befe (lavender)
            secondary: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            // Semantic
            warning: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
            error: Color::Rgb(243, 139, 168),   // #f38ba8 (red)

            // Speaker attribution
            user: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
            assistant: Color::Rgb(250, 179, 135), // #fab387 (peach)

            // Borders
            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Color used for a message author's label.
    pub fn role_color(&self, role: &str) -> Color {
        match role {
            ROLE_USER => self.user,
            ROLE_ASSISTANT | "ai" => self.assistant,
            _ => self.subtext,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_mocha() {
        let theme = Theme::default();
        assert!(matches!(theme.base, Color::Rgb(30, 30, 46)));
    }

    #[test]
    fn test_role_colors() {
        let theme = Theme::mocha();
        assert_eq!(theme.role_color("user"), theme.user);
        assert_eq!(theme.role_color("assistant"), theme.assistant);
        assert_eq!(theme.role_color("tool"), theme.subtext);
    }
}
