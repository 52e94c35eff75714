//! Member table view.
//!
//! Owns the [`TableStore`] and everything about how the user drives it: the
//! cursor row, which widget has focus, and the text inputs for search and
//! inline edit. Key presses are translated into [`TableAction`]s; anything the
//! app should react to (toasts, reloads) is returned as a [`MembersAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use crate::api::types::{Member, MemberId};
use crate::events::KeyContext;
use crate::table::{HeaderToggle, Outcome, TableAction, TableStore};
use crate::ui::components::{render_pagination, LoadingIndicator, MemberTable, TextInput};
use crate::ui::theme::theme;

/// Which part of the view receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Navigation keys drive the table.
    #[default]
    Table,
    /// Keys are typed into the search box.
    Search,
    /// Keys are typed into the focused field of the row under edit.
    Edit,
}

/// State of the member load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A load is in flight.
    Loading,
    /// Members are available.
    Ready,
    /// The last load failed with this message.
    Failed(String),
}

/// Things the app should react to after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembersAction {
    /// Start a new load.
    Reload,
    /// Rows were removed.
    Deleted(usize),
    /// A row was saved.
    Saved(MemberId),
    /// Save found no row with this id.
    SaveTargetMissing(MemberId),
    /// The edit was abandoned.
    EditDiscarded,
    /// Bulk delete was requested with an empty selection.
    NothingSelected,
}

/// The member table screen.
pub struct MembersView {
    store: TableStore,
    /// Cursor row within the current page.
    cursor: usize,
    focus: Focus,
    search: TextInput,
    /// Text of the field currently being edited.
    editor: TextInput,
    status: LoadStatus,
    loading: LoadingIndicator,
}

impl MembersView {
    /// Create an empty view. Call [`Self::begin_loading`] before the first load.
    pub fn new(page_size: usize, header_toggle: HeaderToggle) -> Self {
        let mut search = TextInput::new();
        search.set_placeholder("Press / to search by name, email or role");

        Self {
            store: TableStore::new(page_size, header_toggle),
            cursor: 0,
            focus: Focus::Table,
            search,
            editor: TextInput::new(),
            status: LoadStatus::Loading,
            loading: LoadingIndicator::with_message("Loading members..."),
        }
    }

    /// The table state.
    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Cursor row within the current page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Which part of the view has focus.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Current load status.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Check if keys are being typed into an input.
    ///
    /// While true, global shortcuts like `q` and `?` must not fire.
    pub fn is_capturing_input(&self) -> bool {
        self.focus != Focus::Table
    }

    /// The key context for the help bar.
    pub fn key_context(&self) -> KeyContext {
        match self.focus {
            Focus::Table => KeyContext::Table,
            Focus::Search => KeyContext::Search,
            Focus::Edit => KeyContext::Edit,
        }
    }

    /// Mark a load as in flight.
    pub fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
        self.loading.start();
    }

    /// Replace the collection with freshly loaded members.
    ///
    /// Returns the number of members loaded.
    pub fn finish_loading(&mut self, members: Vec<Member>) -> usize {
        self.loading.stop();
        self.status = LoadStatus::Ready;
        let count = match self.store.apply(TableAction::Load(members)) {
            Outcome::Loaded(count) => count,
            _ => self.store.members().len(),
        };
        self.sync_focus();
        self.clamp_cursor();
        count
    }

    /// Record a failed load.
    pub fn fail_loading(&mut self, message: impl Into<String>) {
        self.loading.stop();
        self.status = LoadStatus::Failed(message.into());
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.loading.tick();
    }

    /// Handle a key press.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<MembersAction> {
        let action = match self.focus {
            Focus::Table => self.handle_table_key(key),
            Focus::Search => self.handle_search_key(key),
            Focus::Edit => self.handle_edit_key(key),
        };
        self.sync_focus();
        self.clamp_cursor();
        action
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<MembersAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.cursor = self.cursor.saturating_add(1);
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
                self.change_page(TableAction::NextPage);
                None
            }
            (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
                self.change_page(TableAction::PrevPage);
                None
            }
            (KeyCode::Home, _) => {
                self.change_page(TableAction::FirstPage);
                None
            }
            (KeyCode::End, _) => {
                self.change_page(TableAction::LastPage);
                None
            }
            (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
                let page = c.to_digit(10).map_or(1, |d| d as usize);
                self.change_page(TableAction::GoToPage(page));
                None
            }
            (KeyCode::Char(' '), _) => {
                if let Some(id) = self.cursor_id() {
                    self.store.apply(TableAction::ToggleOne(id));
                }
                None
            }
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                self.store.apply(TableAction::TogglePage);
                None
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
                let id = self.cursor_id()?;
                if self.store.apply(TableAction::StartEdit(id)) == Outcome::Changed {
                    self.focus = Focus::Edit;
                    self.load_editor();
                }
                None
            }
            (KeyCode::Char('d'), KeyModifiers::NONE) => {
                let id = self.cursor_id()?;
                match self.store.apply(TableAction::Delete(id)) {
                    Outcome::Deleted(count) => Some(MembersAction::Deleted(count)),
                    _ => None,
                }
            }
            (KeyCode::Char('D'), _) => {
                if self.store.selection().is_empty() {
                    return Some(MembersAction::NothingSelected);
                }
                match self.store.apply(TableAction::BulkDelete) {
                    Outcome::Deleted(count) => Some(MembersAction::Deleted(count)),
                    _ => None,
                }
            }
            (KeyCode::Char('/'), KeyModifiers::NONE) => {
                self.focus = Focus::Search;
                None
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => {
                if matches!(self.status, LoadStatus::Failed(_)) {
                    Some(MembersAction::Reload)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<MembersAction> {
        match key.code {
            KeyCode::Enter => {
                self.focus = Focus::Table;
            }
            KeyCode::Esc => {
                self.search.clear();
                self.apply_query();
                self.focus = Focus::Table;
            }
            _ => {
                if self.search.handle_input(key) {
                    self.apply_query();
                }
            }
        }
        None
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<MembersAction> {
        match key.code {
            KeyCode::Esc => {
                self.store.apply(TableAction::CancelEdit);
                self.focus = Focus::Table;
                Some(MembersAction::EditDiscarded)
            }
            KeyCode::Enter => {
                self.focus = Focus::Table;
                match self.store.apply(TableAction::Save) {
                    Outcome::Saved(id) => Some(MembersAction::Saved(id)),
                    Outcome::SaveTargetMissing(id) => Some(MembersAction::SaveTargetMissing(id)),
                    _ => None,
                }
            }
            KeyCode::Tab => {
                self.store.apply(TableAction::FocusNextField);
                self.load_editor();
                None
            }
            KeyCode::BackTab => {
                self.store.apply(TableAction::FocusPrevField);
                self.load_editor();
                None
            }
            _ => {
                if self.editor.handle_input(key) {
                    if let Some(field) = self.store.edit().focus() {
                        let value = self.editor.value().to_string();
                        self.store.apply(TableAction::ChangeField(field, value));
                    }
                }
                None
            }
        }
    }

    fn apply_query(&mut self) {
        let query = self.search.value().to_string();
        if self.store.apply(TableAction::SetQuery(query)) == Outcome::Changed {
            self.cursor = 0;
        }
    }

    fn change_page(&mut self, action: TableAction) {
        if self.store.apply(action) == Outcome::Changed {
            debug!(page = self.store.page(), "Page changed");
            self.cursor = 0;
        }
    }

    /// Put the draft value of the focused field into the editor.
    fn load_editor(&mut self) {
        let edit = self.store.edit();
        let value = match (edit.draft(), edit.focus()) {
            (Some(draft), Some(field)) => draft.field(field).to_string(),
            _ => String::new(),
        };
        self.editor.set_value(value);
    }

    /// Id of the member under the cursor.
    fn cursor_id(&self) -> Option<MemberId> {
        self.store
            .page_rows()
            .get(self.cursor)
            .map(|member| member.id.clone())
    }

    /// Leave edit focus if the edit session ended underneath it.
    fn sync_focus(&mut self) {
        if self.focus == Focus::Edit && self.store.edit().is_idle() {
            self.focus = Focus::Table;
        }
    }

    fn clamp_cursor(&mut self) {
        let rows = self.store.page_rows().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    /// Render the view.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.search
            .render_with_label(frame, chunks[0], "Search", self.focus == Focus::Search);

        match &self.status {
            LoadStatus::Loading if self.store.members().is_empty() => {
                self.render_loading(frame, chunks[1]);
            }
            LoadStatus::Failed(message) if self.store.members().is_empty() => {
                render_failure(frame, chunks[1], message);
            }
            _ => {
                MemberTable::new(&self.store, self.cursor, &self.editor).render(frame, chunks[1]);
            }
        }

        render_pagination(frame, chunks[2], &self.store);
        frame.render_widget(Paragraph::new(self.status_line()), chunks[3]);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme().muted());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let middle = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
        self.loading.render(frame, middle);
    }

    /// Mode and page position, shown under the navigator.
    fn status_line(&self) -> Line<'static> {
        let t = theme();
        let mode_style = Style::default()
            .fg(t.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED);

        let mode = match self.focus {
            Focus::Table => " TABLE ".to_string(),
            Focus::Search => " SEARCH ".to_string(),
            Focus::Edit => match self.store.edit().focus() {
                Some(field) => format!(" EDIT {} ", field.label().to_uppercase()),
                None => " EDIT ".to_string(),
            },
        };

        let mut spans = vec![Span::styled(mode, mode_style), Span::raw(" ")];

        match &self.status {
            LoadStatus::Loading => spans.push(Span::styled(self.loading.text(), t.muted())),
            LoadStatus::Failed(_) => spans.push(Span::styled(
                "Load failed, press r to retry",
                Style::default().fg(t.error),
            )),
            LoadStatus::Ready => {
                let count = self.store.page_count();
                if count > 0 {
                    spans.push(Span::styled(
                        format!("Page {} of {}", self.store.page(), count),
                        t.muted(),
                    ));
                }
            }
        }

        Line::from(spans)
    }
}

fn render_failure(frame: &mut Frame, area: Rect, message: &str) {
    let t = theme();
    let text = vec![
        Line::from(Span::styled(
            "Could not load members",
            Style::default().fg(t.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press r to try again", t.muted())),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.error)),
        );
    frame.render_widget(paragraph, area);
}
