//! Row selection for bulk actions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::types::{Member, MemberId};

/// How the header checkbox applies to the rows on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderToggle {
    /// Flip every visible row independently. A partially selected page stays
    /// partially selected (with the membership inverted).
    #[default]
    Toggle,
    /// Select every visible row, or deselect them all if they already are.
    SelectAll,
}

/// The set of selected member ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<MemberId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of one id. Returns whether it is now selected.
    pub fn toggle_one(&mut self, id: &MemberId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Flip membership of each id independently.
    pub fn toggle_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a MemberId>) {
        for id in ids {
            self.toggle_one(id);
        }
    }

    /// Select every given id, or deselect them all if all are already selected.
    pub fn select_all_or_none<'a>(&mut self, ids: impl IntoIterator<Item = &'a MemberId>) {
        let ids: Vec<&MemberId> = ids.into_iter().collect();
        if self.all_selected(ids.iter().copied()) {
            for id in ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(ids.into_iter().cloned());
        }
    }

    /// True when `ids` is non-empty and every id in it is selected.
    pub fn all_selected<'a>(&self, ids: impl IntoIterator<Item = &'a MemberId>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.ids.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Check if an id is selected.
    pub fn contains(&self, id: &MemberId) -> bool {
        self.ids.contains(id)
    }

    /// Drop ids that no longer refer to a member.
    pub fn retain_present(&mut self, members: &[Member]) {
        if self.ids.is_empty() {
            return;
        }
        let present: HashSet<&MemberId> = members.iter().map(|m| &m.id).collect();
        self.ids.retain(|id| present.contains(id));
    }

    /// Remove one id if present.
    pub fn remove(&mut self, id: &MemberId) {
        self.ids.remove(id);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> MemberId {
        MemberId::new(s)
    }

    #[test]
    fn test_toggle_one_is_involution() {
        let mut selection = Selection::new();
        selection.toggle_one(&id("1"));
        let before = selection.clone();

        assert!(selection.toggle_one(&id("2")));
        assert!(!selection.toggle_one(&id("2")));
        assert_eq!(selection, before);
    }

    #[test]
    fn test_toggle_many_is_per_row_xor() {
        let mut selection = Selection::new();
        selection.toggle_one(&id("1"));

        let page = [id("1"), id("2"), id("3")];
        selection.toggle_many(page.iter());

        assert!(!selection.contains(&id("1")));
        assert!(selection.contains(&id("2")));
        assert!(selection.contains(&id("3")));
    }

    #[test]
    fn test_select_all_or_none() {
        let mut selection = Selection::new();
        selection.toggle_one(&id("1"));

        let page = [id("1"), id("2")];
        selection.select_all_or_none(page.iter());
        assert!(selection.all_selected(page.iter()));

        selection.select_all_or_none(page.iter());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_all_selected_empty_page() {
        let selection = Selection::new();
        assert!(!selection.all_selected(std::iter::empty()));
    }

    #[test]
    fn test_all_selected_needs_matching_ids_not_matching_size() {
        let mut selection = Selection::new();
        selection.toggle_one(&id("9"));
        selection.toggle_one(&id("8"));

        let page = [id("1"), id("2")];
        assert_eq!(selection.len(), page.len());
        assert!(!selection.all_selected(page.iter()));
    }

    #[test]
    fn test_retain_present() {
        let mut selection = Selection::new();
        selection.toggle_one(&id("1"));
        selection.toggle_one(&id("2"));

        let members = vec![Member::new("2", "Bo", "b@x.com", "User")];
        selection.retain_present(&members);

        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&id("2")));
    }

    #[test]
    fn test_header_toggle_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: HeaderToggle,
        }
        let parsed: Wrapper = toml::from_str("mode = \"select-all\"").unwrap();
        assert_eq!(parsed.mode, HeaderToggle::SelectAll);
        let parsed: Wrapper = toml::from_str("mode = \"toggle\"").unwrap();
        assert_eq!(parsed.mode, HeaderToggle::Toggle);
    }
}
