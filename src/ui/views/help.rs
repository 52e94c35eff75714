//! Help screen listing every key binding.
//!
//! Opened with '?' from the table and closed with '?', 'q' or Esc. The list
//! scrolls when the terminal is too short to show it all.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::events::{get_keybindings_grouped, KeyContext, Keybinding};
use crate::ui::theme::theme;

/// Actions that can be returned from the help view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    /// Close the help screen.
    Close,
}

/// The help screen.
pub struct HelpView {
    sections: Vec<(KeyContext, Vec<Keybinding>)>,
    /// First visible line.
    scroll: usize,
    /// Lines that fit in the last rendered area.
    visible_height: usize,
}

impl HelpView {
    /// Create a help view scrolled to the top.
    pub fn new() -> Self {
        Self {
            sections: get_keybindings_grouped(),
            scroll: 0,
            visible_height: 0,
        }
    }

    /// Jump back to the top.
    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    /// Heading, blank line, bindings and a trailing blank per section, then the footer.
    fn line_count(&self) -> usize {
        self.sections
            .iter()
            .map(|(_, bindings)| bindings.len() + 3)
            .sum::<usize>()
            + 1
    }

    fn max_scroll(&self) -> usize {
        self.line_count().saturating_sub(self.visible_height)
    }

    fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll.saturating_add_signed(delta);
        self.scroll = target.min(self.max_scroll());
    }

    /// Handle a key press. Every key is consumed while help is open.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<HelpAction> {
        let page = self.visible_height.saturating_sub(2).max(1) as isize;

        match (key.code, key.modifiers) {
            (KeyCode::Char('?'), KeyModifiers::NONE | KeyModifiers::SHIFT)
            | (KeyCode::Char('q'), KeyModifiers::NONE)
            | (KeyCode::Esc, _) => return Some(HelpAction::Close),
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => self.scroll_by(1),
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => self.scroll_by(-1),
            (KeyCode::PageDown, _) | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.scroll_by(page)
            }
            (KeyCode::PageUp, _) | (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.scroll_by(-page)
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => self.scroll = 0,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.scroll = self.max_scroll(),
            _ => {}
        }
        None
    }

    /// Render over `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.visible_height = inner.height as usize;
        self.scroll = self.scroll.min(self.max_scroll());

        let paragraph = Paragraph::new(self.lines()).scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, inner);

        if self.line_count() > self.visible_height {
            let mut state = ScrollbarState::new(self.max_scroll()).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let t = theme();
        let heading = Style::default().fg(t.editing).add_modifier(Modifier::BOLD);
        let key_style = Style::default().fg(t.accent).add_modifier(Modifier::BOLD);

        let mut lines = Vec::with_capacity(self.line_count());
        for (context, bindings) in &self.sections {
            lines.push(Line::from(Span::styled(
                format!("── {} ──", context.display()),
                heading,
            )));
            lines.push(Line::default());
            lines.extend(bindings.iter().map(|binding| {
                Line::from(vec![
                    Span::styled(format!("{:>14}", binding.key), key_style),
                    Span::raw("  "),
                    Span::raw(binding.description),
                ])
            }));
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "Press ?, q or Esc to close",
            t.muted(),
        )));
        lines
    }
}

impl Default for HelpView {
    fn default() -> Self {
        Self::new()
    }
}
