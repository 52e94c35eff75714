//! User interface components and views.
//!
//! This module contains all TUI rendering logic, including views for different
//! screens and reusable UI components.

mod components;
pub mod theme;
mod views;

pub use components::{
    highlight_text, render_context_help, LoadingIndicator, MemberTable, Notification,
    NotificationManager, NotificationType, TextInput,
};
pub use theme::theme;
pub use views::{Focus, HelpAction, HelpView, LoadStatus, MembersAction, MembersView};
