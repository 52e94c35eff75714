//! Colors used across the UI.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for titles and active elements.
    pub accent: Color,
    /// Muted text (hints, separators, empty states).
    pub muted: Color,
    /// Background of the row under the cursor.
    pub cursor_bg: Color,
    /// Text color of selected rows.
    pub selected_fg: Color,
    /// Color of the row under edit.
    pub editing: Color,
    /// Error text.
    pub error: Color,
    /// Background of text matching the search query.
    pub match_bg: Color,
    /// Foreground of text matching the search query.
    pub match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            cursor_bg: Color::Rgb(40, 44, 52),
            selected_fg: Color::LightMagenta,
            editing: Color::Yellow,
            error: Color::Red,
            match_bg: Color::Yellow,
            match_fg: Color::Black,
        }
    }
}

impl Theme {
    /// Style for column headers.
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for query matches inside cells.
    pub fn match_highlight(&self) -> Style {
        Style::default()
            .bg(self.match_bg)
            .fg(self.match_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for muted text.
    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// The active theme.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
