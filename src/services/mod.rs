pub mod catalog;
pub mod issuance;

pub use issuance::{issue_item, IssueOutcome, IssueRequest};
