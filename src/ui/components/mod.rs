//! Reusable UI components.

mod help_bar;
mod highlight;
mod input;
mod loading;
mod notification;
mod table;

pub use help_bar::render_context_help;
pub use highlight::highlight_text;
pub use input::TextInput;
pub use loading::LoadingIndicator;
pub use notification::{Notification, NotificationManager, NotificationType};
pub use table::{pagination_line, render_pagination, MemberTable};
