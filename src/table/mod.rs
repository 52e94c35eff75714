//! Member table state: filtering, pagination, selection and inline editing.
//!
//! The UI never mutates rows directly. It sends [`TableAction`]s to a
//! [`TableStore`] and renders the derived views it exposes.

mod edit;
mod filter;
mod pagination;
mod selection;
mod store;

pub use edit::EditSession;
pub use filter::{filter_members, matches_query};
pub use pagination::{clamp_page, page_count, page_slice, page_window, DEFAULT_PAGE_SIZE};
pub use selection::{HeaderToggle, Selection};
pub use store::{Outcome, TableAction, TableStore};
