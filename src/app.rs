//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern for predictable
//! state management in the TUI application.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, error, info, trace, warn};

use crate::api::types::MemberBatch;
use crate::config::Settings;
use crate::error::AppError;
use crate::events::{Event, KeyContext};
use crate::tasks::ApiMessage;
use crate::ui::{
    render_context_help, theme, HelpAction, HelpView, MembersAction, MembersView,
    NotificationManager,
};

/// The current view/screen state of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// The first member load is pending.
    #[default]
    Loading,
    /// Displaying the member table.
    Table,
    /// Help screen is displayed.
    Help,
    /// Application is in the process of exiting.
    Exiting,
}

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    /// The current view state.
    state: AppState,
    /// Whether the application should quit.
    should_quit: bool,
    /// The member table.
    members_view: MembersView,
    /// The help screen.
    help_view: HelpView,
    /// Notification manager for toast messages.
    notifications: NotificationManager,
    /// Where members are loaded from, shown in the header.
    source_label: String,
    /// Generation of the load whose result is awaited.
    generation: u64,
    /// Set when the user asked for a reload; taken by the event loop.
    reload_requested: bool,
}

impl App {
    /// Create a new application instance.
    pub fn new(settings: &Settings, source_label: impl Into<String>) -> Self {
        debug!("Creating new application instance");

        Self {
            state: AppState::Loading,
            should_quit: false,
            members_view: MembersView::new(settings.page_size, settings.header_toggle),
            help_view: HelpView::new(),
            notifications: NotificationManager::new(),
            source_label: source_label.into(),
            generation: 0,
            reload_requested: false,
        }
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the current application state.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Get a reference to the member view.
    pub fn members_view(&self) -> &MembersView {
        &self.members_view
    }

    /// Get a reference to the notification manager.
    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Generation of the load currently awaited.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a new load and return its generation.
    ///
    /// Results carrying any other generation are ignored from now on.
    pub fn start_load(&mut self) -> u64 {
        self.generation += 1;
        self.members_view.begin_loading();
        info!(generation = self.generation, source = %self.source_label, "Loading members");
        self.generation
    }

    /// Take a pending reload request, if any.
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Apply a message from a background task.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::MembersLoaded { generation, result } => {
                if self.state == AppState::Exiting {
                    debug!(generation, "Exiting, ignoring load result");
                    return;
                }
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "Ignoring stale load result"
                    );
                    return;
                }

                match result {
                    Ok(batch) => self.on_members_loaded(batch),
                    Err(e) => self.on_load_failed(AppError::from(e)),
                }

                if self.state == AppState::Loading {
                    self.state = AppState::Table;
                }
            }
        }
    }

    fn on_members_loaded(&mut self, batch: MemberBatch) {
        let MemberBatch { members, rejected } = batch;
        let count = self.members_view.finish_loading(members);
        info!(count, rejected = rejected.len(), "Members loaded");

        if !rejected.is_empty() {
            for entry in &rejected {
                warn!(index = entry.index, reason = %entry.reason, "Skipped member entry");
            }
            self.notifications.warning(format!(
                "Skipped {} invalid {}",
                rejected.len(),
                plural(rejected.len(), "entry", "entries")
            ));
        }
        self.notifications.info(format!(
            "Loaded {} {}",
            count,
            plural(count, "member", "members")
        ));
    }

    fn on_load_failed(&mut self, err: AppError) {
        error!(error = %err, "Member load failed");
        let message = err.user_message();
        self.members_view.fail_loading(message.clone());

        let toast = match err.suggested_action() {
            Some(action) => format!("{} {}", message, action),
            None => message,
        };
        self.notifications.error(toast);
    }

    /// Update the application state based on an event.
    ///
    /// This implements the Update part of The Elm Architecture (TEA).
    /// All state changes flow through this method for predictable behavior.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.quit();
            }
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Resize(width, height) => {
                // ratatui redraws at the new size on the next frame.
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.handle_tick(),
        }
    }

    fn quit(&mut self) {
        self.should_quit = true;
        self.state = AppState::Exiting;
    }

    /// Handle keyboard input events.
    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            self.quit();
            return;
        }

        match self.state {
            AppState::Help => {
                if let Some(HelpAction::Close) = self.help_view.handle_input(key_event) {
                    self.state = AppState::Table;
                }
            }
            AppState::Loading | AppState::Table => {
                // Some terminals report '?' with SHIFT.
                if !self.members_view.is_capturing_input()
                    && matches!(key_event.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT)
                {
                    match key_event.code {
                        KeyCode::Char('q') => {
                            self.quit();
                            return;
                        }
                        KeyCode::Char('?') => {
                            self.help_view.reset_scroll();
                            self.state = AppState::Help;
                            return;
                        }
                        _ => {}
                    }
                }

                if let Some(action) = self.members_view.handle_input(key_event) {
                    self.handle_members_action(action);
                }
            }
            AppState::Exiting => {}
        }
    }

    fn handle_members_action(&mut self, action: MembersAction) {
        match action {
            MembersAction::Reload => {
                info!("Reload requested");
                self.reload_requested = true;
            }
            MembersAction::Deleted(count) => {
                self.notifications.success(format!(
                    "Deleted {} {}",
                    count,
                    plural(count, "member", "members")
                ));
            }
            MembersAction::Saved(id) => {
                self.notifications.success(format!("Saved member {}", id));
            }
            MembersAction::SaveTargetMissing(id) => {
                self.notifications
                    .warning(format!("Member {} no longer exists, changes discarded", id));
            }
            MembersAction::EditDiscarded => {
                self.notifications.info("Edit discarded");
            }
            MembersAction::NothingSelected => {
                self.notifications.warning("No members selected");
            }
        }
    }

    /// Handle periodic tick events.
    fn handle_tick(&mut self) {
        self.members_view.tick();
        self.notifications.tick();
    }

    /// Render the application UI.
    ///
    /// This implements the View part of The Elm Architecture (TEA).
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        self.render_header(frame, chunks[0]);

        match self.state {
            AppState::Help => self.help_view.render(frame, chunks[1]),
            _ => self.members_view.render(frame, chunks[1]),
        }

        let context = match self.state {
            AppState::Help => KeyContext::Help,
            _ => self.members_view.key_context(),
        };
        render_context_help(frame, chunks[2], context);

        self.notifications.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let title = Line::from(vec![
            Span::styled(
                "Admin UI",
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", self.source_label), t.muted()),
        ]);

        let header = Paragraph::new(title).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(t.muted()),
        );
        frame.render_widget(header, area);
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
