//! Member table and page navigator widgets.
//!
//! Both are pure renderers over a [`TableStore`]: they read derived views and
//! never change state.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState as WidgetState},
    Frame,
};

use super::highlight::highlight_text;
use super::input::TextInput;
use crate::api::types::{Member, MemberField};
use crate::table::{page_window, TableStore};
use crate::ui::theme::theme;

/// Most page numbers shown in the navigator at once.
const MAX_PAGE_NUMBERS: usize = 9;

/// Checkbox glyph.
fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// The member table for the current page.
pub struct MemberTable<'a> {
    store: &'a TableStore,
    /// Index of the cursor row within the page.
    cursor: usize,
    /// Input holding the focused field's text while editing.
    editor: &'a TextInput,
}

impl<'a> MemberTable<'a> {
    /// Create a table renderer.
    pub fn new(store: &'a TableStore, cursor: usize, editor: &'a TextInput) -> Self {
        Self {
            store,
            cursor,
            editor,
        }
    }

    /// Render into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let rows = self.store.page_rows();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(t.muted())
            .title(Span::styled(" Members ", t.header()));

        if rows.is_empty() {
            let message = if self.store.query().is_empty() {
                "No members".to_string()
            } else {
                format!("No members match '{}'", self.store.query())
            };
            let empty = Paragraph::new(message)
                .style(t.muted())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            std::iter::once(Cell::from(checkbox(self.store.header_checked())))
                .chain(MemberField::ALL.iter().map(|f| Cell::from(f.label()))),
        )
        .style(t.header());

        let body: Vec<Row> = rows.iter().map(|member| self.render_row(member)).collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ];

        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .highlight_style(Style::default().bg(t.cursor_bg))
            .highlight_symbol("▶ ");

        let mut state = WidgetState::default();
        state.select(Some(self.cursor.min(rows.len() - 1)));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_row(&self, member: &Member) -> Row<'static> {
        let t = theme();
        let selected = self.store.is_selected(&member.id);
        let edit = self.store.edit();

        let mut cells = vec![Cell::from(checkbox(selected))];

        match (edit.draft(), edit.focus()) {
            (Some(draft), Some(focus)) if edit.is_editing(&member.id) => {
                for field in MemberField::ALL {
                    let cell = if field == focus {
                        Cell::from(editing_line(self.editor))
                    } else {
                        Cell::from(draft.field(field).to_string())
                    };
                    cells.push(cell);
                }
                return Row::new(cells).style(Style::default().fg(t.editing));
            }
            _ => {}
        }

        let query = self.store.query();
        for field in MemberField::ALL {
            cells.push(Cell::from(highlight_text(member.field(field), query)));
        }

        let style = if selected {
            Style::default().fg(t.selected_fg)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    }
}

/// The focused edit cell with a visible cursor.
fn editing_line(editor: &TextInput) -> Line<'static> {
    let value = editor.value();
    let split = value
        .char_indices()
        .nth(editor.cursor())
        .map(|(i, _)| i)
        .unwrap_or(value.len());

    let underline = Style::default().add_modifier(Modifier::UNDERLINED);
    Line::from(vec![
        Span::styled(value[..split].to_string(), underline),
        Span::styled("▏", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(value[split..].to_string(), underline),
    ])
}

/// Build the page navigator line.
///
/// Shows a window of 1-based page numbers with the current one highlighted,
/// followed by row and selection counts.
pub fn pagination_line(store: &TableStore) -> Line<'static> {
    let t = theme();
    let count = store.page_count();
    let current = store.page();
    let window = page_window(current, count, MAX_PAGE_NUMBERS);

    let mut spans = Vec::new();

    if count > 0 {
        let arrow = |enabled: bool, glyph: &'static str| {
            let style = if enabled { Style::default() } else { t.muted() };
            Span::styled(glyph, style)
        };

        spans.push(arrow(current > 1, "‹ "));
        if *window.start() > 1 {
            spans.push(Span::styled("… ", t.muted()));
        }
        for page in window.clone() {
            if page == current {
                spans.push(Span::styled(
                    format!("[{}]", page),
                    Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw(page.to_string()));
            }
            spans.push(Span::raw(" "));
        }
        if *window.end() < count {
            spans.push(Span::styled("… ", t.muted()));
        }
        spans.push(arrow(current < count, "›"));
        spans.push(Span::raw("   "));
    }

    let filtered = store.filtered_count();
    let total = store.members().len();
    let counts = if filtered == total {
        format!("{} members", total)
    } else {
        format!("{} of {} members", filtered, total)
    };
    spans.push(Span::styled(counts, t.muted()));

    let selected = store.selection().len();
    if selected > 0 {
        spans.push(Span::styled(
            format!(" · {} selected", selected),
            Style::default().fg(t.selected_fg),
        ));
    }

    Line::from(spans)
}

/// Render the page navigator centered in `area`.
pub fn render_pagination(frame: &mut Frame, area: Rect, store: &TableStore) {
    let paragraph = Paragraph::new(pagination_line(store)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
