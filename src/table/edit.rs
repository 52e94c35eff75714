//! Inline edit session.
//!
//! At most one row is edited at a time. The draft is a full copy of the row
//! so saving replaces the stored row wholesale.

use tracing::debug;

use crate::api::types::{Member, MemberField, MemberId};

/// The edit state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    /// No row is being edited.
    #[default]
    Idle,
    /// A row is being edited.
    Editing {
        /// Id of the row under edit.
        id: MemberId,
        /// Working copy of the row.
        draft: Member,
        /// Field that receives typed input.
        focus: MemberField,
    },
}

impl EditSession {
    /// Begin editing a row.
    ///
    /// An edit already in progress is discarded; its id is returned.
    pub fn start(&mut self, member: &Member) -> Option<MemberId> {
        let discarded = match std::mem::take(self) {
            EditSession::Editing { id, .. } if id != member.id => Some(id),
            _ => None,
        };
        if let Some(ref id) = discarded {
            debug!(discarded = %id, editing = %member.id, "Switching edit target");
        }
        *self = EditSession::Editing {
            id: member.id.clone(),
            draft: member.clone(),
            focus: MemberField::default(),
        };
        discarded
    }

    /// Update one field of the draft. Returns false when idle.
    pub fn change_field(&mut self, field: MemberField, value: impl Into<String>) -> bool {
        match self {
            EditSession::Editing { draft, .. } => {
                draft.set_field(field, value);
                true
            }
            EditSession::Idle => false,
        }
    }

    /// Move input focus to the next field. Returns false when idle.
    pub fn focus_next(&mut self) -> bool {
        match self {
            EditSession::Editing { focus, .. } => {
                *focus = focus.next();
                true
            }
            EditSession::Idle => false,
        }
    }

    /// Move input focus to the previous field. Returns false when idle.
    pub fn focus_prev(&mut self) -> bool {
        match self {
            EditSession::Editing { focus, .. } => {
                *focus = focus.prev();
                true
            }
            EditSession::Idle => false,
        }
    }

    /// End the session, returning the draft to be saved.
    pub fn finish(&mut self) -> Option<Member> {
        match std::mem::take(self) {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// End the session and throw the draft away.
    pub fn cancel(&mut self) -> Option<MemberId> {
        match std::mem::take(self) {
            EditSession::Editing { id, .. } => Some(id),
            EditSession::Idle => None,
        }
    }

    /// Id of the row under edit.
    pub fn editing_id(&self) -> Option<&MemberId> {
        match self {
            EditSession::Editing { id, .. } => Some(id),
            EditSession::Idle => None,
        }
    }

    /// Check if the given row is under edit.
    pub fn is_editing(&self, id: &MemberId) -> bool {
        self.editing_id() == Some(id)
    }

    /// The working copy, if editing.
    pub fn draft(&self) -> Option<&Member> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// The focused field, if editing.
    pub fn focus(&self) -> Option<MemberField> {
        match self {
            EditSession::Editing { focus, .. } => Some(*focus),
            EditSession::Idle => None,
        }
    }

    /// Check if idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, EditSession::Idle)
    }
}
