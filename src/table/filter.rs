//! Free-text filtering of the member collection.

use crate::api::types::{Member, MemberField};

/// Check whether a member matches an already-lowercased query.
///
/// A member matches when its name, email or role contains the query.
pub fn matches_query(member: &Member, query_lower: &str) -> bool {
    MemberField::ALL
        .iter()
        .any(|field| member.field(*field).to_lowercase().contains(query_lower))
}

/// Filter members by a case-insensitive substring query.
///
/// The result preserves collection order. An empty query matches everything.
pub fn filter_members<'a>(members: &'a [Member], query: &str) -> Vec<&'a Member> {
    if query.is_empty() {
        return members.iter().collect();
    }

    let query_lower = query.to_lowercase();
    members
        .iter()
        .filter(|member| matches_query(member, &query_lower))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Member> {
        vec![
            Member::new("1", "Ann", "a@x.com", "Admin"),
            Member::new("2", "Bo", "b@x.com", "User"),
            Member::new("3", "Cyd Adams", "cyd@corp.io", "member"),
            Member::new("4", "Dee", "dee@x.com", "admin"),
        ]
    }

    #[test]
    fn test_empty_query_is_identity() {
        let members = sample();
        let filtered = filter_members(&members, "");
        assert_eq!(filtered.len(), members.len());
        for (a, b) in filtered.iter().zip(members.iter()) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let members = sample();
        let ids: Vec<&str> = filter_members(&members, "ADMIN")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_query_matches_any_field() {
        let members = sample();
        let by_name: Vec<&str> = filter_members(&members, "adams")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(by_name, vec!["3"]);

        let by_email: Vec<&str> = filter_members(&members, "corp.io")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(by_email, vec!["3"]);
    }

    #[test]
    fn test_id_is_not_searched() {
        let members = vec![Member::new("42", "Ann", "a@x.com", "Admin")];
        assert!(filter_members(&members, "42").is_empty());
    }

    #[test]
    fn test_no_matches() {
        let members = sample();
        assert!(filter_members(&members, "zzz").is_empty());
    }

    #[test]
    fn test_filtered_view_is_ordered_subsequence() {
        let members = sample();
        for query in ["", "a", "x.com", "ADM", "e", "@", "nothing"] {
            let filtered = filter_members(&members, query);
            let mut cursor = 0;
            for row in &filtered {
                let pos = members[cursor..]
                    .iter()
                    .position(|m| m.id == row.id)
                    .expect("row must come from the collection, in order");
                cursor += pos + 1;
                assert!(matches_query(row, &query.to_lowercase()));
            }
        }
    }
}
