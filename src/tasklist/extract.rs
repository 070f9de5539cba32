//! Tree walk turning a checklist document into issue drafts.

use tracing::debug;

use super::{
	ast::{Block, ListNode},
	render::{render_list, render_paragraph},
};

/// Prefix identifying an open checklist entry in rendered entry text.
const UNCHECKED_MARKER: &str = "[ ] ";
/// Separator between heading segments of a qualified title.
const TITLE_SEPARATOR: &str = " - ";

const HEADINGS_MAX: usize = 6;

/// Heading context of the walk, one slot per heading level.
/// Slot 0 is never used; headings are indexed by their 1-based level.
#[derive(Debug, Default)]
pub struct HeadingStack {
	levels: [Option<String>; HEADINGS_MAX + 1],
}

impl HeadingStack {
	/// Store a heading, invalidating the now-stale deeper context while
	/// preserving shallower ancestors.
	pub fn set(&mut self, level: usize, text: String) {
		debug_assert!((1..=HEADINGS_MAX).contains(&level), "heading level out of range: {level}");
		let level = level.clamp(1, HEADINGS_MAX);
		for slot in &mut self.levels[level..] {
			*slot = None;
		}
		self.levels[level] = Some(text);
	}

	/// Qualify `title` with every ancestor heading, shallow to deep,
	/// stopping at the first unset level.
	pub fn qualify(&self, title: &str) -> String {
		let mut qualified = String::new();
		for heading in &self.levels[1..] {
			let Some(heading) = heading else { break };
			qualified.push_str(heading);
			qualified.push_str(TITLE_SEPARATOR);
		}
		qualified.push_str(title);
		qualified
	}
}

/// One extracted checklist entry, ready to become an issue.
///
/// `source_marker` is the exact rendered text that identified the entry,
/// kept verbatim so the caller can later replace it with an issue reference
/// in the source document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssueDraft {
	pub source_marker: String,
	pub title: String,
	pub body: Option<String>,
}

impl IssueDraft {
	/// Prepend `prefix` to the title.
	pub fn prefix_title(&mut self, prefix: &str) {
		self.title.insert_str(0, prefix);
	}
}

/// Walk `blocks` depth-first and collect a draft for every unchecked
/// checklist entry, in document order.
pub fn extract(blocks: &[Block]) -> Vec<IssueDraft> {
	let mut headings = HeadingStack::default();
	let mut drafts = Vec::new();
	for block in blocks {
		match block {
			Block::Heading { level, text } => headings.set(*level, text.clone()),
			Block::List(list) => extract_list(list, &headings, &mut drafts),
		}
	}
	debug!(count = drafts.len(), "extracted checklist entries");
	drafts
}

fn extract_list(list: &ListNode, headings: &HeadingStack, drafts: &mut Vec<IssueDraft>) {
	for item in &list.items {
		let rendered = render_paragraph(&item.text);
		let mut own = classify(&rendered, headings);
		if let (Some(draft), Some(nested)) = (own.as_mut(), &item.nested) {
			draft.body = Some(render_list(nested));
		}
		drafts.extend(own);
		if let Some(nested) = &item.nested {
			extract_list(nested, headings, drafts);
		}
	}
}

/// An entry yields a draft only when its text opens with the unchecked
/// marker; checked entries and plain bullets are skipped.
fn classify(rendered: &str, headings: &HeadingStack) -> Option<IssueDraft> {
	let title = rendered.strip_prefix(UNCHECKED_MARKER)?;
	Some(IssueDraft {
		source_marker: rendered.to_string(),
		title: headings.qualify(title),
		body: None,
	})
}
