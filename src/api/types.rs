//! Member record types and load-boundary validation.
//!
//! The remote resource is a JSON array of loosely shaped objects. Everything
//! past this module works with [`Member`], so each element is checked here and
//! anything that does not fit is quarantined as a [`RejectedEntry`] instead of
//! being trusted.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ApiError, Result};

/// Identifier of a member row.
///
/// Row identity is always by id, never by position or value, so selection and
/// edit state survive rows being replaced by edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One row of the member table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique row identifier.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role label (e.g. "admin", "member").
    pub role: String,
}

impl Member {
    /// Create a new member.
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// Get the value of an editable field.
    pub fn field(&self, field: MemberField) -> &str {
        match field {
            MemberField::Name => &self.name,
            MemberField::Email => &self.email,
            MemberField::Role => &self.role,
        }
    }

    /// Replace the value of an editable field.
    pub fn set_field(&mut self, field: MemberField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MemberField::Name => self.name = value,
            MemberField::Email => self.email = value,
            MemberField::Role => self.role = value,
        }
    }
}

/// The searchable and editable fields of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberField {
    /// The name column.
    #[default]
    Name,
    /// The email column.
    Email,
    /// The role column.
    Role,
}

impl MemberField {
    /// All fields in column order.
    pub const ALL: [MemberField; 3] = [MemberField::Name, MemberField::Email, MemberField::Role];

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            MemberField::Name => "Name",
            MemberField::Email => "Email",
            MemberField::Role => "Role",
        }
    }

    /// The next field in column order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            MemberField::Name => MemberField::Email,
            MemberField::Email => MemberField::Role,
            MemberField::Role => MemberField::Name,
        }
    }

    /// The previous field in column order, wrapping around.
    pub fn prev(&self) -> Self {
        match self {
            MemberField::Name => MemberField::Role,
            MemberField::Email => MemberField::Name,
            MemberField::Role => MemberField::Email,
        }
    }
}

/// An element of the payload that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position of the element in the JSON array.
    pub index: usize,
    /// Why the element was rejected.
    pub reason: String,
}

/// The result of validating a member payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberBatch {
    /// Accepted members, in payload order.
    pub members: Vec<Member>,
    /// Elements that were quarantined.
    pub rejected: Vec<RejectedEntry>,
}

/// Wire shape of an id: the resource uses strings, but numbers are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Wire shape of a member. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawMember {
    id: RawId,
    name: String,
    email: String,
    role: String,
}

impl RawMember {
    fn into_member(self) -> std::result::Result<Member, String> {
        let id = match self.id {
            RawId::Text(text) => text.trim().to_string(),
            RawId::Number(number) => number.to_string(),
        };
        if id.is_empty() {
            return Err("id cannot be empty".to_string());
        }
        Ok(Member {
            id: MemberId(id),
            name: self.name,
            email: self.email,
            role: self.role,
        })
    }
}

/// Parse and validate a member payload.
///
/// The body must be a JSON array. Each element is validated on its own;
/// malformed elements and repeated ids are returned in
/// [`MemberBatch::rejected`] rather than failing the whole load.
///
/// # Errors
///
/// Returns `ApiError::InvalidResponse` if the body is not JSON or not an array.
pub fn parse_members(body: &str) -> Result<MemberBatch> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let serde_json::Value::Array(items) = value else {
        return Err(ApiError::InvalidResponse(
            "expected a JSON array of members".to_string(),
        ));
    };

    let mut batch = MemberBatch::default();
    let mut seen: HashSet<MemberId> = HashSet::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let member = serde_json::from_value::<RawMember>(item)
            .map_err(|e| e.to_string())
            .and_then(RawMember::into_member);

        match member {
            Ok(member) if seen.contains(&member.id) => {
                warn!(index, id = %member.id, "Duplicate member id in payload");
                batch.rejected.push(RejectedEntry {
                    index,
                    reason: format!("duplicate id '{}'", member.id),
                });
            }
            Ok(member) => {
                seen.insert(member.id.clone());
                batch.members.push(member);
            }
            Err(reason) => {
                warn!(index, %reason, "Rejected malformed member entry");
                batch.rejected.push(RejectedEntry { index, reason });
            }
        }
    }

    debug!(
        accepted = batch.members.len(),
        rejected = batch.rejected.len(),
        "Validated member payload"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_members_accepts_valid_array() {
        let body = r#"[
            {"id": "1", "name": "Aaron Miles", "email": "aaron@mailinator.com", "role": "member"},
            {"id": "2", "name": "Aishwarya Naik", "email": "aishwarya@mailinator.com", "role": "admin"}
        ]"#;

        let batch = parse_members(body).unwrap();
        assert_eq!(batch.members.len(), 2);
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.members[0].id.as_str(), "1");
        assert_eq!(batch.members[1].role, "admin");
    }

    #[test]
    fn test_parse_members_numeric_id() {
        let body = r#"[{"id": 7, "name": "Ann", "email": "a@x.com", "role": "Admin"}]"#;
        let batch = parse_members(body).unwrap();
        assert_eq!(batch.members[0].id, MemberId::new("7"));
    }

    #[test]
    fn test_parse_members_ignores_extra_fields() {
        let body =
            r#"[{"id": "1", "name": "Ann", "email": "a@x.com", "role": "Admin", "team": "core"}]"#;
        let batch = parse_members(body).unwrap();
        assert_eq!(batch.members.len(), 1);
    }

    #[test]
    fn test_parse_members_quarantines_malformed_entries() {
        let body = r#"[
            {"id": "1", "name": "Ann", "email": "a@x.com", "role": "Admin"},
            {"id": "2", "name": "Bo", "email": "b@x.com"},
            "not an object",
            {"id": "", "name": "Cy", "email": "c@x.com", "role": "User"}
        ]"#;

        let batch = parse_members(body).unwrap();
        assert_eq!(batch.members.len(), 1);
        let indices: Vec<usize> = batch.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(!batch.rejected[1].reason.is_empty());
        assert!(batch.rejected[2].reason.contains("id cannot be empty"));
    }

    #[test]
    fn test_parse_members_rejects_duplicate_ids() {
        let body = r#"[
            {"id": "1", "name": "Ann", "email": "a@x.com", "role": "Admin"},
            {"id": "1", "name": "Ann again", "email": "a2@x.com", "role": "User"}
        ]"#;

        let batch = parse_members(body).unwrap();
        assert_eq!(batch.members.len(), 1);
        assert_eq!(batch.members[0].name, "Ann");
        assert_eq!(batch.rejected.len(), 1);
        assert!(batch.rejected[0].reason.contains("duplicate id"));
    }

    #[test]
    fn test_parse_members_rejects_non_array() {
        let err = parse_members(r#"{"members": []}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_parse_members_rejects_invalid_json() {
        let err = parse_members("<html>").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_members_empty_array() {
        let batch = parse_members("[]").unwrap();
        assert!(batch.members.is_empty());
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_member_field_accessors() {
        let mut member = Member::new("1", "Ann", "a@x.com", "Admin");
        assert_eq!(member.field(MemberField::Email), "a@x.com");
        member.set_field(MemberField::Role, "Lead");
        assert_eq!(member.role, "Lead");
    }

    #[test]
    fn test_member_field_cycle() {
        assert_eq!(MemberField::Name.next(), MemberField::Email);
        assert_eq!(MemberField::Role.next(), MemberField::Name);
        assert_eq!(MemberField::Name.prev(), MemberField::Role);
        for field in MemberField::ALL {
            assert_eq!(field.next().prev(), field);
        }
    }
}
