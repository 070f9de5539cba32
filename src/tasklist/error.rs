//! Error types for checklist parsing.
//!
//! Uses miette for rich diagnostics with source code spans.

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Error type for checklist documents.
/// Covers both the line-level dialect gate and structural mismatches in the
/// parsed tree. Structural mismatches are fatal: there is no partial
/// extraction, the whole document is rejected.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum ParseError {
	#[error("unsupported markdown line")]
	#[diagnostic(code(md2issues::parse::unsupported_line), help("every line must be a heading ('# ...'), a bullet ('- ...'), or blank"))]
	UnsupportedLine {
		#[source_code]
		src: NamedSource<String>,
		#[label("neither a heading, a bullet, nor blank")]
		span: SourceSpan,
	},

	#[error("unsupported block at document top level")]
	#[diagnostic(code(md2issues::parse::unexpected_block), help("a checklist document holds only headings and lists at the top level"))]
	UnexpectedBlock {
		#[source_code]
		src: NamedSource<String>,
		#[label("found {found} here")]
		span: SourceSpan,
		found: String,
	},

	#[error("heading must hold exactly one plain text span")]
	#[diagnostic(code(md2issues::parse::heading_shape))]
	HeadingShape {
		#[source_code]
		src: NamedSource<String>,
		#[label("this heading")]
		span: SourceSpan,
	},

	#[error("list item without leading text")]
	#[diagnostic(code(md2issues::parse::missing_item_text), help("a list item starts with its own text, optionally followed by one nested list"))]
	MissingItemText {
		#[source_code]
		src: NamedSource<String>,
		#[label("this item")]
		span: SourceSpan,
	},

	#[error("unexpected content after a list item's nested list")]
	#[diagnostic(code(md2issues::parse::trailing_item_content), help("a list item holds at most its own text and one nested list"))]
	TrailingItemContent {
		#[source_code]
		src: NamedSource<String>,
		#[label("found {found} here")]
		span: SourceSpan,
		found: String,
	},

	#[error("unsupported inline content")]
	#[diagnostic(code(md2issues::parse::unsupported_inline), help("item text supports plain text, code spans, emphasis, strong and strikethrough"))]
	UnsupportedInline {
		#[source_code]
		src: NamedSource<String>,
		#[label("found {found} here")]
		span: SourceSpan,
		found: String,
	},

	#[error("malformed markdown event stream: {detail}")]
	#[diagnostic(code(md2issues::parse::malformed_tree))]
	MalformedTree { detail: String },
}
