//! Member resource client and record types.
//!
//! This module loads the member list and validates it into typed records.

mod client;
pub mod error;
pub mod types;

pub use client::{normalize_endpoint, MemberSource, MembersClient, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use types::{Member, MemberBatch, MemberField, MemberId, RejectedEntry};
