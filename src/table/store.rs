//! The table state container.
//!
//! `TableStore` owns the collection, query, page, selection and edit session.
//! Every mutation goes through [`TableStore::apply`]; the filtered view and
//! the page slice are derived on demand and never stored.
//!
//! After each mutation the store reconciles its invariants:
//! - the selection only holds ids present in the collection,
//! - the edit session only references a row present in the collection,
//! - the page number stays within `[1, max(1, page_count)]`.

use tracing::{debug, info, warn};

use super::edit::EditSession;
use super::filter::filter_members;
use super::pagination::{clamp_page, page_count, page_slice, DEFAULT_PAGE_SIZE};
use super::selection::{HeaderToggle, Selection};
use crate::api::types::{Member, MemberField, MemberId};

/// A user or loader intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    /// Replace the collection with freshly loaded rows.
    Load(Vec<Member>),
    /// Set the search query.
    SetQuery(String),
    /// Jump to a page (1-based).
    GoToPage(usize),
    /// Go to the next page.
    NextPage,
    /// Go to the previous page.
    PrevPage,
    /// Go to the first page.
    FirstPage,
    /// Go to the last page.
    LastPage,
    /// Flip selection of one row.
    ToggleOne(MemberId),
    /// Apply the header checkbox to the current page.
    TogglePage,
    /// Delete every selected row.
    BulkDelete,
    /// Delete one row.
    Delete(MemberId),
    /// Start editing a row.
    StartEdit(MemberId),
    /// Update a field of the draft.
    ChangeField(MemberField, String),
    /// Move edit focus to the next field.
    FocusNextField,
    /// Move edit focus to the previous field.
    FocusPrevField,
    /// Write the draft back to the collection.
    Save,
    /// Discard the draft.
    CancelEdit,
}

/// What an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed.
    Changed,
    /// The action had no effect.
    Unchanged,
    /// The collection was replaced with this many rows.
    Loaded(usize),
    /// This many rows were deleted.
    Deleted(usize),
    /// The row with this id was saved.
    Saved(MemberId),
    /// The row under edit no longer exists; nothing was written.
    SaveTargetMissing(MemberId),
}

/// State container for the member table.
#[derive(Debug, Clone)]
pub struct TableStore {
    /// The collection, in load order.
    members: Vec<Member>,
    /// Free-text search query.
    query: String,
    /// Current page (1-based).
    page: usize,
    /// Rows per page.
    page_size: usize,
    /// Selected row ids.
    selection: Selection,
    /// Inline edit session.
    edit: EditSession,
    /// Header checkbox behavior.
    header_toggle: HeaderToggle,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, HeaderToggle::default())
    }
}

impl TableStore {
    /// Create an empty store.
    ///
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize, header_toggle: HeaderToggle) -> Self {
        Self {
            members: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            selection: Selection::new(),
            edit: EditSession::Idle,
            header_toggle,
        }
    }

    /// Apply an action and reconcile invariants.
    pub fn apply(&mut self, action: TableAction) -> Outcome {
        let outcome = match action {
            TableAction::Load(members) => self.load(members),
            TableAction::SetQuery(query) => self.set_query(query),
            TableAction::GoToPage(page) => self.go_to_page(page),
            TableAction::NextPage => self.go_to_page(self.page.saturating_add(1)),
            TableAction::PrevPage => self.go_to_page(self.page.saturating_sub(1)),
            TableAction::FirstPage => self.go_to_page(1),
            TableAction::LastPage => self.go_to_page(self.page_count()),
            TableAction::ToggleOne(id) => self.toggle_one(&id),
            TableAction::TogglePage => self.toggle_page(),
            TableAction::BulkDelete => self.bulk_delete(),
            TableAction::Delete(id) => self.delete(&id),
            TableAction::StartEdit(id) => self.start_edit(&id),
            TableAction::ChangeField(field, value) => self.change_field(field, value),
            TableAction::FocusNextField => changed_if(self.edit.focus_next()),
            TableAction::FocusPrevField => changed_if(self.edit.focus_prev()),
            TableAction::Save => self.save(),
            TableAction::CancelEdit => match self.edit.cancel() {
                Some(id) => {
                    debug!(id = %id, "Edit cancelled");
                    Outcome::Changed
                }
                None => Outcome::Unchanged,
            },
        };
        self.reconcile();
        outcome
    }

    fn load(&mut self, members: Vec<Member>) -> Outcome {
        let count = members.len();
        self.members = members;
        info!(count, "Collection replaced");
        Outcome::Loaded(count)
    }

    fn set_query(&mut self, query: String) -> Outcome {
        if query == self.query {
            return Outcome::Unchanged;
        }
        self.query = query;
        Outcome::Changed
    }

    fn go_to_page(&mut self, page: usize) -> Outcome {
        let page = clamp_page(page, self.filtered_count(), self.page_size);
        if page == self.page {
            return Outcome::Unchanged;
        }
        self.page = page;
        Outcome::Changed
    }

    fn toggle_one(&mut self, id: &MemberId) -> Outcome {
        if !self.contains(id) {
            return Outcome::Unchanged;
        }
        self.selection.toggle_one(id);
        Outcome::Changed
    }

    fn toggle_page(&mut self) -> Outcome {
        let ids: Vec<MemberId> = self.page_rows().iter().map(|m| m.id.clone()).collect();
        if ids.is_empty() {
            return Outcome::Unchanged;
        }
        match self.header_toggle {
            HeaderToggle::Toggle => self.selection.toggle_many(ids.iter()),
            HeaderToggle::SelectAll => self.selection.select_all_or_none(ids.iter()),
        }
        Outcome::Changed
    }

    fn bulk_delete(&mut self) -> Outcome {
        if self.selection.is_empty() {
            return Outcome::Unchanged;
        }
        let before = self.members.len();
        let selection = &self.selection;
        self.members.retain(|m| !selection.contains(&m.id));
        self.selection.clear();

        let deleted = before - self.members.len();
        info!(deleted, "Bulk delete");
        Outcome::Deleted(deleted)
    }

    fn delete(&mut self, id: &MemberId) -> Outcome {
        let before = self.members.len();
        self.members.retain(|m| &m.id != id);
        if self.members.len() == before {
            return Outcome::Unchanged;
        }
        self.selection.remove(id);
        info!(id = %id, "Row deleted");
        Outcome::Deleted(1)
    }

    fn start_edit(&mut self, id: &MemberId) -> Outcome {
        let Some(member) = self.members.iter().find(|m| &m.id == id) else {
            return Outcome::Unchanged;
        };
        self.edit.start(member);
        Outcome::Changed
    }

    fn change_field(&mut self, field: MemberField, value: String) -> Outcome {
        changed_if(self.edit.change_field(field, value))
    }

    fn save(&mut self) -> Outcome {
        let Some(draft) = self.edit.finish() else {
            return Outcome::Unchanged;
        };

        match self.members.iter_mut().find(|m| m.id == draft.id) {
            Some(row) => {
                let id = draft.id.clone();
                *row = draft;
                info!(id = %id, "Row saved");
                Outcome::Saved(id)
            }
            None => {
                warn!(id = %draft.id, "Save target no longer exists");
                Outcome::SaveTargetMissing(draft.id)
            }
        }
    }

    /// Restore invariants after a mutation.
    fn reconcile(&mut self) {
        self.selection.retain_present(&self.members);

        if let Some(id) = self.edit.editing_id() {
            if !self.members.iter().any(|m| &m.id == id) {
                debug!(id = %id, "Edited row is gone, ending edit session");
                self.edit.cancel();
            }
        }

        self.page = clamp_page(self.page, self.filtered_count(), self.page_size);
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// The full collection.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Check if a row with this id exists.
    pub fn contains(&self, id: &MemberId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    /// Rows matching the query, in collection order.
    pub fn filtered(&self) -> Vec<&Member> {
        filter_members(&self.members, &self.query)
    }

    /// Number of rows matching the query.
    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&Member> {
        page_slice(&self.filtered(), self.page, self.page_size).to_vec()
    }

    /// Number of pages in the filtered view.
    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.page_size)
    }

    /// Current page (1-based).
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Check if a row is selected.
    pub fn is_selected(&self, id: &MemberId) -> bool {
        self.selection.contains(id)
    }

    /// Header checkbox state: every row on the page is selected.
    pub fn header_checked(&self) -> bool {
        self.selection
            .all_selected(self.page_rows().into_iter().map(|m| &m.id))
    }

    /// The edit session.
    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    /// Header checkbox behavior.
    pub fn header_toggle(&self) -> HeaderToggle {
        self.header_toggle
    }
}

fn changed_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann_and_bo() -> Vec<Member> {
        vec![
            Member::new("1", "Ann", "a@x.com", "Admin"),
            Member::new("2", "Bo", "b@x.com", "User"),
        ]
    }

    fn many(count: usize) -> Vec<Member> {
        (1..=count)
            .map(|i| {
                let role = if i % 3 == 0 { "admin" } else { "member" };
                Member::new(
                    i.to_string(),
                    format!("Person {}", i),
                    format!("p{}@x.com", i),
                    role,
                )
            })
            .collect()
    }

    fn loaded(members: Vec<Member>) -> TableStore {
        let mut store = TableStore::default();
        store.apply(TableAction::Load(members));
        store
    }

    fn ids(rows: &[&Member]) -> Vec<String> {
        rows.iter().map(|m| m.id.to_string()).collect()
    }

    #[test]
    fn test_load_replaces_collection() {
        let mut store = loaded(many(3));
        let outcome = store.apply(TableAction::Load(ann_and_bo()));
        assert_eq!(outcome, Outcome::Loaded(2));
        assert_eq!(store.members().len(), 2);
    }

    #[test]
    fn test_query_admin_scenario() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::SetQuery("admin".to_string()));

        assert_eq!(ids(&store.filtered()), vec!["1"]);
        assert_eq!(ids(&store.page_rows()), vec!["1"]);
        assert_eq!(store.page_count(), 1);
    }

    #[test]
    fn test_bulk_delete_scenario() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::ToggleOne(MemberId::new("1")));
        store.apply(TableAction::ToggleOne(MemberId::new("2")));

        assert_eq!(store.apply(TableAction::BulkDelete), Outcome::Deleted(2));
        assert!(store.members().is_empty());
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_edit_save_scenario() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::StartEdit(MemberId::new("2")));
        store.apply(TableAction::ChangeField(MemberField::Role, "Lead".to_string()));

        assert_eq!(
            store.apply(TableAction::Save),
            Outcome::Saved(MemberId::new("2"))
        );
        assert_eq!(store.members()[1].role, "Lead");
        assert_eq!(store.members()[1].name, "Bo");
        assert!(store.edit().is_idle());
    }

    #[test]
    fn test_bulk_delete_removes_exactly_selected() {
        let mut store = loaded(many(12));
        for id in ["2", "5", "11"] {
            store.apply(TableAction::ToggleOne(MemberId::new(id)));
        }

        assert_eq!(store.apply(TableAction::BulkDelete), Outcome::Deleted(3));
        let remaining: Vec<String> = store.members().iter().map(|m| m.id.to_string()).collect();
        assert_eq!(remaining.len(), 9);
        assert!(!remaining.contains(&"2".to_string()));
        assert!(!remaining.contains(&"5".to_string()));
        assert!(!remaining.contains(&"11".to_string()));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_bulk_delete_with_empty_selection() {
        let mut store = loaded(ann_and_bo());
        assert_eq!(store.apply(TableAction::BulkDelete), Outcome::Unchanged);
        assert_eq!(store.members().len(), 2);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut store = loaded(ann_and_bo());
        assert_eq!(
            store.apply(TableAction::ToggleOne(MemberId::new("99"))),
            Outcome::Unchanged
        );
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_pagination_through_store() {
        let mut store = loaded(many(25));
        assert_eq!(store.page_count(), 3);
        assert_eq!(store.page_rows().len(), 10);

        store.apply(TableAction::LastPage);
        assert_eq!(store.page(), 3);
        assert_eq!(ids(&store.page_rows()), vec!["21", "22", "23", "24", "25"]);

        assert_eq!(store.apply(TableAction::NextPage), Outcome::Unchanged);
        assert_eq!(store.page(), 3);

        store.apply(TableAction::FirstPage);
        assert_eq!(store.apply(TableAction::PrevPage), Outcome::Unchanged);
        assert_eq!(store.page(), 1);

        store.apply(TableAction::GoToPage(2));
        assert_eq!(store.page_rows()[0].id.as_str(), "11");
    }

    #[test]
    fn test_query_clamps_page() {
        let mut store = loaded(many(30));
        store.apply(TableAction::GoToPage(3));
        assert_eq!(store.page(), 3);

        // Ten admins: one page.
        store.apply(TableAction::SetQuery("admin".to_string()));
        assert_eq!(store.page_count(), 1);
        assert_eq!(store.page(), 1);
        assert_eq!(store.page_rows().len(), 10);
    }

    #[test]
    fn test_delete_clamps_page() {
        let mut store = loaded(many(11));
        store.apply(TableAction::GoToPage(2));
        assert_eq!(store.page_rows().len(), 1);

        store.apply(TableAction::Delete(MemberId::new("11")));
        assert_eq!(store.page(), 1);
        assert_eq!(store.page_rows().len(), 10);
    }

    #[test]
    fn test_empty_view_has_zero_pages_and_page_one() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::SetQuery("nobody".to_string()));
        assert_eq!(store.page_count(), 0);
        assert_eq!(store.page(), 1);
        assert!(store.page_rows().is_empty());
        assert!(!store.header_checked());
    }

    #[test]
    fn test_delete_reconciles_selection_and_edit() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::ToggleOne(MemberId::new("2")));
        store.apply(TableAction::StartEdit(MemberId::new("2")));

        assert_eq!(
            store.apply(TableAction::Delete(MemberId::new("2"))),
            Outcome::Deleted(1)
        );
        assert!(store.selection().is_empty());
        assert!(store.edit().is_idle());
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut store = loaded(ann_and_bo());
        assert_eq!(
            store.apply(TableAction::Delete(MemberId::new("3"))),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_bulk_delete_ends_edit_of_deleted_row() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::StartEdit(MemberId::new("1")));
        store.apply(TableAction::ToggleOne(MemberId::new("1")));
        store.apply(TableAction::BulkDelete);
        assert!(store.edit().is_idle());
    }

    #[test]
    fn test_save_target_missing_after_reload() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::StartEdit(MemberId::new("2")));

        // Bypass reconcile to simulate the row vanishing under the session.
        store.members.retain(|m| m.id.as_str() != "2");

        assert_eq!(
            store.apply(TableAction::Save),
            Outcome::SaveTargetMissing(MemberId::new("2"))
        );
        assert_eq!(store.members().len(), 1);
        assert!(store.edit().is_idle());
    }

    #[test]
    fn test_save_when_idle() {
        let mut store = loaded(ann_and_bo());
        assert_eq!(store.apply(TableAction::Save), Outcome::Unchanged);
    }

    #[test]
    fn test_cancel_edit_discards_draft() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::StartEdit(MemberId::new("1")));
        store.apply(TableAction::ChangeField(MemberField::Name, "Zed".to_string()));

        assert_eq!(store.apply(TableAction::CancelEdit), Outcome::Changed);
        assert_eq!(store.members()[0].name, "Ann");
        assert!(store.edit().is_idle());
        assert_eq!(store.apply(TableAction::CancelEdit), Outcome::Unchanged);
    }

    #[test]
    fn test_field_focus_needs_an_edit() {
        let mut store = TableStore::default();
        assert_eq!(store.apply(TableAction::FocusNextField), Outcome::Unchanged);
        assert_eq!(store.apply(TableAction::FocusPrevField), Outcome::Unchanged);

        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::StartEdit(MemberId::new("1")));
        assert_eq!(store.apply(TableAction::FocusNextField), Outcome::Changed);
        assert_eq!(store.edit().focus(), Some(MemberField::Email));
        assert_eq!(store.apply(TableAction::FocusPrevField), Outcome::Changed);
        assert_eq!(store.edit().focus(), Some(MemberField::Name));
    }

    #[test]
    fn test_start_edit_unknown_row() {
        let mut store = loaded(ann_and_bo());
        assert_eq!(
            store.apply(TableAction::StartEdit(MemberId::new("7"))),
            Outcome::Unchanged
        );
        assert!(store.edit().is_idle());
    }

    #[test]
    fn test_saved_row_keeps_position() {
        let mut store = loaded(many(3));
        store.apply(TableAction::StartEdit(MemberId::new("2")));
        store.apply(TableAction::ChangeField(MemberField::Name, "Renamed".to_string()));
        store.apply(TableAction::Save);

        let names: Vec<&str> = store.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Person 1", "Renamed", "Person 3"]);
    }

    #[test]
    fn test_toggle_page_xor() {
        let mut store = loaded(many(12));
        store.apply(TableAction::ToggleOne(MemberId::new("1")));
        store.apply(TableAction::TogglePage);

        assert!(!store.is_selected(&MemberId::new("1")));
        assert_eq!(store.selection().len(), 9);
        assert!(!store.header_checked());
    }

    #[test]
    fn test_toggle_page_select_all_mode() {
        let mut store = TableStore::new(10, HeaderToggle::SelectAll);
        store.apply(TableAction::Load(many(12)));
        store.apply(TableAction::ToggleOne(MemberId::new("1")));

        store.apply(TableAction::TogglePage);
        assert_eq!(store.selection().len(), 10);
        assert!(store.header_checked());

        store.apply(TableAction::TogglePage);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_header_checked_tracks_current_page() {
        let mut store = loaded(many(12));
        store.apply(TableAction::TogglePage);
        assert!(store.header_checked());

        store.apply(TableAction::NextPage);
        assert!(!store.header_checked());
    }

    #[test]
    fn test_header_checked_on_size_coincidence() {
        let mut store = loaded(many(12));
        store.apply(TableAction::GoToPage(2));
        // Two rows on page 2, two selected rows on page 1.
        store.apply(TableAction::ToggleOne(MemberId::new("1")));
        store.apply(TableAction::ToggleOne(MemberId::new("2")));
        assert_eq!(store.page_rows().len(), 2);
        assert!(!store.header_checked());
    }

    #[test]
    fn test_selection_survives_query_change() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::ToggleOne(MemberId::new("2")));
        store.apply(TableAction::SetQuery("admin".to_string()));
        assert!(store.is_selected(&MemberId::new("2")));
    }

    #[test]
    fn test_reload_drops_stale_selection() {
        let mut store = loaded(ann_and_bo());
        store.apply(TableAction::ToggleOne(MemberId::new("2")));
        store.apply(TableAction::Load(vec![Member::new("1", "Ann", "a@x.com", "Admin")]));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let store = TableStore::new(0, HeaderToggle::Toggle);
        assert_eq!(store.page_size(), 1);
    }
}
