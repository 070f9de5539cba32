//! Serialize tree nodes back to literal markdown.
//!
//! Entry text is reconstructed verbatim: the result doubles as the
//! find/replace anchor in the source document, so it must match the source
//! byte for byte. Whole lists go through pulldown_cmark_to_cmark, which
//! normalizes bullets to `-` and keeps nested structure re-parseable.

use pulldown_cmark::{Event, Tag, TagEnd};
use pulldown_cmark_to_cmark::{Options as CmarkOptions, cmark_with_options};

use super::ast::{Inline, ListNode, Paragraph};

/// Render a paragraph's inline content to the literal text it was parsed from.
pub fn render_paragraph(paragraph: &Paragraph) -> String {
	let mut rendered = String::new();
	render_inlines(&paragraph.0, &mut rendered);
	rendered
}

fn render_inlines(inlines: &[Inline], out: &mut String) {
	for inline in inlines {
		match inline {
			Inline::Text(text) => out.push_str(text),
			Inline::Code(code) => render_code_span(code, out),
			Inline::Emphasis(inner) => {
				out.push('*');
				render_inlines(inner, out);
				out.push('*');
			}
			Inline::Strong(inner) => {
				out.push_str("**");
				render_inlines(inner, out);
				out.push_str("**");
			}
			Inline::Strikethrough(inner) => {
				out.push_str("~~");
				render_inlines(inner, out);
				out.push_str("~~");
			}
			Inline::SoftBreak => out.push(' '),
			Inline::HardBreak => out.push_str("  \n"),
		}
	}
}

/// The fence must be one backtick longer than any backtick run inside the
/// span, padded when a run could touch the fence.
fn render_code_span(code: &str, out: &mut String) {
	let mut longest = 0;
	let mut current = 0;
	for c in code.chars() {
		if c == '`' {
			current += 1;
			longest = longest.max(current);
		} else {
			current = 0;
		}
	}
	let fence = "`".repeat(longest + 1);
	out.push_str(&fence);
	if longest > 0 {
		out.push(' ');
	}
	out.push_str(code);
	if longest > 0 {
		out.push(' ');
	}
	out.push_str(&fence);
}

/// Render a (possibly nested) list back to markdown lines.
pub fn render_list(list: &ListNode) -> String {
	let mut events = Vec::new();
	push_list_events(list, &mut events);
	let mut rendered = String::new();
	let options = CmarkOptions {
		list_token: '-',
		..Default::default()
	};
	cmark_with_options(events.into_iter(), &mut rendered, options).expect("writing markdown to a String cannot fail");
	rendered
}

fn push_list_events<'a>(list: &'a ListNode, events: &mut Vec<Event<'a>>) {
	events.push(Event::Start(Tag::List(list.start)));
	for item in &list.items {
		events.push(Event::Start(Tag::Item));
		push_inline_events(&item.text.0, events);
		if let Some(nested) = &item.nested {
			push_list_events(nested, events);
		}
		events.push(Event::End(TagEnd::Item));
	}
	events.push(Event::End(TagEnd::List(list.start.is_some())));
}

fn push_inline_events<'a>(inlines: &'a [Inline], events: &mut Vec<Event<'a>>) {
	for inline in inlines {
		match inline {
			Inline::Text(text) => events.push(Event::Text(text.as_str().into())),
			Inline::Code(code) => events.push(Event::Code(code.as_str().into())),
			Inline::SoftBreak => events.push(Event::SoftBreak),
			Inline::HardBreak => events.push(Event::HardBreak),
			Inline::Emphasis(inner) => {
				events.push(Event::Start(Tag::Emphasis));
				push_inline_events(inner, events);
				events.push(Event::End(TagEnd::Emphasis));
			}
			Inline::Strong(inner) => {
				events.push(Event::Start(Tag::Strong));
				push_inline_events(inner, events);
				events.push(Event::End(TagEnd::Strong));
			}
			Inline::Strikethrough(inner) => {
				events.push(Event::Start(Tag::Strikethrough));
				push_inline_events(inner, events);
				events.push(Event::End(TagEnd::Strikethrough));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tasklist::{Block, parse_document};

	fn first_list(source: &str) -> ListNode {
		let blocks = parse_document(source, "test.md").unwrap();
		match blocks.into_iter().next() {
			Some(Block::List(list)) => list,
			other => panic!("expected a list, got {other:?}"),
		}
	}

	#[test]
	fn paragraph_text_is_verbatim() {
		let list = first_list("- [ ] `kanye` to `ye`");
		assert_eq!(render_paragraph(&list.items[0].text), "[ ] `kanye` to `ye`");
	}

	#[test]
	fn emphasis_and_strong_round_trip() {
		let list = first_list("- *em* **st** ~~gone~~");
		assert_eq!(render_paragraph(&list.items[0].text), "*em* **st** ~~gone~~");
	}

	#[test]
	fn code_span_with_inner_backtick_gets_longer_fence() {
		let mut out = String::new();
		render_code_span("a`b", &mut out);
		assert_eq!(out, "`` a`b ``");
	}

	#[test]
	fn single_entry_list_renders_with_dash_bullet() {
		let list = first_list("- fu");
		assert_eq!(render_list(&list), "- fu");
	}

	#[test]
	fn sibling_entries_render_one_per_line() {
		let list = first_list("- one\n- two");
		assert_eq!(render_list(&list), "- one\n- two");
	}

	#[test]
	fn rendered_lists_reparse_to_the_same_tree() {
		let list = first_list("- top\n    - mid `code`\n        - deep\n- [ ] tail");
		let rendered = render_list(&list);
		assert_eq!(first_list(&rendered), list);
	}

	#[test]
	fn rendered_numbered_lists_reparse_to_the_same_tree() {
		let list = first_list("2. a\n3. b");
		assert_eq!(first_list(&render_list(&list)), list);
	}
}
