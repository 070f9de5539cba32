//! Line-level dialect gate.
//!
//! Cheap structural check run before parsing: a checklist document consists
//! of headings, bullet list entries and blank lines, nothing else.

use miette::NamedSource;

use super::ParseError;

/// Check that every line of `input` fits the checklist dialect.
/// The first offending line is reported with its source span.
pub fn check(input: &str, source_name: &str) -> Result<(), ParseError> {
	let mut offset = 0;
	for line in input.split('\n') {
		let trimmed = line.trim();
		if !(trimmed.is_empty() || is_bullet_line(trimmed) || is_heading_line(trimmed)) {
			return Err(ParseError::UnsupportedLine {
				src: NamedSource::new(source_name, input.to_string()),
				span: (offset, line.len()).into(),
			});
		}
		offset += line.len() + 1;
	}
	Ok(())
}

/// Boolean form of [`check`].
pub fn is_valid(input: &str) -> bool {
	check(input, "checklist").is_ok()
}

fn is_bullet_line(line: &str) -> bool {
	let mut chars = line.chars();
	matches!(chars.next(), Some('-' | '+' | '*')) && chars.next() == Some(' ')
}

fn is_heading_line(line: &str) -> bool {
	let content = line.trim_start_matches('#');
	content.len() < line.len() && content.starts_with(' ')
}
