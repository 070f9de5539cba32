//! Markdown checklist parsing.
//!
//! A checklist document is a restricted markdown dialect: headings, bullet
//! lists (possibly nested) and blank lines. This module validates the
//! dialect, parses it into a typed tree, and extracts unchecked checklist
//! entries as issue drafts.

mod ast;
pub use ast::{Block, Inline, ListItem, ListNode, Paragraph, parse_document};

mod error;
pub use error::ParseError;

mod extract;
pub use extract::{HeadingStack, IssueDraft, extract};

mod render;
pub use render::{render_list, render_paragraph};

mod validate;
pub use validate::{check, is_valid};
