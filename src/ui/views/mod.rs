//! Application views (screens).

mod help;
mod members;

pub use help::{HelpAction, HelpView};
pub use members::{Focus, LoadStatus, MembersAction, MembersView};
