//! Turn markdown checklists into Github issues.
//!
//! The core pipeline is pure: validate the restricted checklist dialect,
//! parse it into a typed tree, extract unchecked entries as issue drafts.
//! The Github client and the generator around it do the remote work.

pub mod config;
pub mod generate;
pub mod github;
pub mod mock_github;
pub mod tasklist;

// Re-export the pipeline types at crate root for convenience
pub use generate::{DryRunIssue, GeneratedIssue, IssueGenerator};
pub use tasklist::{Block, HeadingStack, Inline, IssueDraft, ListItem, ListNode, Paragraph, ParseError, check, extract, is_valid, parse_document};
