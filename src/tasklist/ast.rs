//! Typed document tree for the checklist dialect.
//!
//! Markdown is parsed with pulldown_cmark and immediately lifted into a
//! small closed set of node kinds. Anything the dialect does not know is a
//! structural error at lift time, so the extraction pass downstream can
//! match exhaustively instead of re-checking node kinds.

use std::{iter::Peekable, ops::Range};

use miette::NamedSource;
use pulldown_cmark::{Event, HeadingLevel, OffsetIter, Options, Parser, Tag, TagEnd};

use super::ParseError;

/// Top-level node of a checklist document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Block {
	Heading { level: usize, text: String },
	List(ListNode),
}

/// A bullet or numbered list. `start` carries the first number of a
/// numbered list, `None` for bullets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListNode {
	pub start: Option<u64>,
	pub items: Vec<ListItem>,
}

/// One list entry: its own text plus at most one nested sub-list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListItem {
	pub text: Paragraph,
	pub nested: Option<ListNode>,
}

/// Inline content of a single list entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Paragraph(pub Vec<Inline>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Inline {
	Text(String),
	Code(String),
	Emphasis(Vec<Inline>),
	Strong(Vec<Inline>),
	Strikethrough(Vec<Inline>),
	SoftBreak,
	HardBreak,
}

/// Parse `source` into the typed tree. `source_name` labels diagnostics.
pub fn parse_document(source: &str, source_name: &str) -> Result<Vec<Block>, ParseError> {
	TreeBuilder::new(source, source_name).build()
}

struct TreeBuilder<'a> {
	source: &'a str,
	source_name: &'a str,
	events: Peekable<OffsetIter<'a>>,
}

impl<'a> TreeBuilder<'a> {
	fn new(source: &'a str, source_name: &'a str) -> Self {
		// Tasklists stay disabled on purpose: `[ ] ` must survive as literal
		// text, both for classification and as the source replacement anchor.
		let options = Options::ENABLE_STRIKETHROUGH;
		let events = Parser::new_ext(source, options).into_offset_iter().peekable();
		Self { source, source_name, events }
	}

	fn build(mut self) -> Result<Vec<Block>, ParseError> {
		let mut blocks = Vec::new();
		while let Some((event, span)) = self.events.next() {
			match event {
				Event::Start(Tag::Heading { level, .. }) => blocks.push(self.heading(level, span)?),
				Event::Start(Tag::List(start)) => blocks.push(Block::List(self.list(start)?)),
				other => {
					return Err(ParseError::UnexpectedBlock {
						src: self.named_source(),
						span: span_of(&span),
						found: event_name(&other).to_string(),
					});
				}
			}
		}
		Ok(blocks)
	}

	fn heading(&mut self, level: HeadingLevel, span: Range<usize>) -> Result<Block, ParseError> {
		let inlines = self.inlines_until(TagEnd::Heading(level))?;
		match inlines.as_slice() {
			[Inline::Text(text)] => Ok(Block::Heading {
				level: level as usize,
				text: text.clone(),
			}),
			_ => Err(ParseError::HeadingShape {
				src: self.named_source(),
				span: span_of(&span),
			}),
		}
	}

	fn list(&mut self, start: Option<u64>) -> Result<ListNode, ParseError> {
		let mut items = Vec::new();
		loop {
			match self.events.next() {
				Some((Event::Start(Tag::Item), span)) => items.push(self.item(span)?),
				Some((Event::End(TagEnd::List(_)), _)) => break,
				Some((other, _)) => {
					return Err(ParseError::MalformedTree {
						detail: format!("expected a list item, found {}", event_name(&other)),
					});
				}
				None => {
					return Err(ParseError::MalformedTree {
						detail: "document ended inside a list".to_string(),
					});
				}
			}
		}
		Ok(ListNode { start, items })
	}

	fn item(&mut self, span: Range<usize>) -> Result<ListItem, ParseError> {
		// Tight lists inline the entry text directly, loose lists wrap it in
		// a paragraph. Both forms lift to the same node.
		let text = if self.events.next_if(|(event, _)| matches!(event, Event::Start(Tag::Paragraph))).is_some() {
			self.inlines_until(TagEnd::Paragraph)?
		} else {
			self.tight_inlines()?
		};
		if text.is_empty() {
			return Err(ParseError::MissingItemText {
				src: self.named_source(),
				span: span_of(&span),
			});
		}

		let nested = if let Some((Event::Start(Tag::List(start)), _)) = self.events.next_if(|(event, _)| matches!(event, Event::Start(Tag::List(_)))) {
			Some(self.list(start)?)
		} else {
			None
		};

		match self.events.next() {
			Some((Event::End(TagEnd::Item), _)) => Ok(ListItem { text: Paragraph(text), nested }),
			Some((other, other_span)) => Err(ParseError::TrailingItemContent {
				src: self.named_source(),
				span: span_of(&other_span),
				found: event_name(&other).to_string(),
			}),
			None => Err(ParseError::MalformedTree {
				detail: "document ended inside a list item".to_string(),
			}),
		}
	}

	fn tight_inlines(&mut self) -> Result<Vec<Inline>, ParseError> {
		let mut inlines = Vec::new();
		while let Some((event, span)) = self.events.next_if(|(event, _)| is_inline_event(event)) {
			let inline = self.inline(event, span)?;
			push_coalesced(&mut inlines, inline);
		}
		Ok(inlines)
	}

	fn inlines_until(&mut self, end: TagEnd) -> Result<Vec<Inline>, ParseError> {
		let mut inlines = Vec::new();
		loop {
			match self.events.next() {
				Some((Event::End(tag_end), _)) if tag_end == end => break,
				Some((event, span)) => {
					let inline = self.inline(event, span)?;
					push_coalesced(&mut inlines, inline);
				}
				None => {
					return Err(ParseError::MalformedTree {
						detail: "document ended inside inline content".to_string(),
					});
				}
			}
		}
		Ok(inlines)
	}

	fn inline(&mut self, event: Event<'a>, span: Range<usize>) -> Result<Inline, ParseError> {
		match event {
			Event::Text(text) => Ok(Inline::Text(text.into_string())),
			Event::Code(code) => Ok(Inline::Code(code.into_string())),
			Event::SoftBreak => Ok(Inline::SoftBreak),
			Event::HardBreak => Ok(Inline::HardBreak),
			Event::Start(Tag::Emphasis) => Ok(Inline::Emphasis(self.inlines_until(TagEnd::Emphasis)?)),
			Event::Start(Tag::Strong) => Ok(Inline::Strong(self.inlines_until(TagEnd::Strong)?)),
			Event::Start(Tag::Strikethrough) => Ok(Inline::Strikethrough(self.inlines_until(TagEnd::Strikethrough)?)),
			Event::End(_) => Err(ParseError::MalformedTree {
				detail: "unbalanced inline content".to_string(),
			}),
			other => Err(ParseError::UnsupportedInline {
				src: self.named_source(),
				span: span_of(&span),
				found: event_name(&other).to_string(),
			}),
		}
	}

	fn named_source(&self) -> NamedSource<String> {
		NamedSource::new(self.source_name, self.source.to_string())
	}
}

fn span_of(range: &Range<usize>) -> miette::SourceSpan {
	(range.start, range.len()).into()
}

fn is_inline_event(event: &Event<'_>) -> bool {
	matches!(
		event,
		Event::Text(_)
			| Event::Code(_)
			| Event::SoftBreak
			| Event::HardBreak
			| Event::InlineHtml(_)
			| Event::InlineMath(_)
			| Event::FootnoteReference(_)
			| Event::Start(Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. })
	)
}

/// Merge adjacent text runs: pulldown_cmark splits them around characters
/// that could have opened inline constructs, the tree wants one run.
fn push_coalesced(inlines: &mut Vec<Inline>, inline: Inline) {
	if let Inline::Text(text) = &inline
		&& let Some(Inline::Text(last)) = inlines.last_mut()
	{
		last.push_str(text);
		return;
	}
	inlines.push(inline);
}

fn event_name(event: &Event<'_>) -> &'static str {
	match event {
		Event::Start(tag) => tag_name(tag),
		Event::End(_) => "a closing tag",
		Event::Text(_) => "text",
		Event::Code(_) => "inline code",
		Event::Html(_) => "an html block",
		Event::InlineHtml(_) => "inline html",
		Event::InlineMath(_) | Event::DisplayMath(_) => "math",
		Event::FootnoteReference(_) => "a footnote reference",
		Event::SoftBreak | Event::HardBreak => "a line break",
		Event::Rule => "a thematic break",
		Event::TaskListMarker(_) => "a task list marker",
	}
}

fn tag_name(tag: &Tag<'_>) -> &'static str {
	match tag {
		Tag::Paragraph => "a paragraph",
		Tag::Heading { .. } => "a heading",
		Tag::BlockQuote(_) => "a block quote",
		Tag::CodeBlock(_) => "a code block",
		Tag::HtmlBlock => "an html block",
		Tag::List(_) => "a list",
		Tag::Item => "a list item",
		Tag::FootnoteDefinition(_) => "a footnote definition",
		Tag::DefinitionList | Tag::DefinitionListTitle | Tag::DefinitionListDefinition => "a definition list",
		Tag::Table(_) | Tag::TableHead | Tag::TableRow | Tag::TableCell => "a table",
		Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Superscript | Tag::Subscript => "inline formatting",
		Tag::Link { .. } => "a link",
		Tag::Image { .. } => "an image",
		Tag::MetadataBlock(_) => "a metadata block",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tasklist::render_paragraph;

	fn parse(source: &str) -> Vec<Block> {
		parse_document(source, "test.md").unwrap()
	}

	#[test]
	fn parses_headings_and_lists() {
		let blocks = parse("# first\n- one\n- two\n## second\n- three");
		assert_eq!(blocks.len(), 3);
		assert_eq!(blocks[0], Block::Heading { level: 1, text: "first".to_string() });
		let Block::List(list) = &blocks[1] else { panic!("expected a list") };
		assert_eq!(list.items.len(), 2);
		assert_eq!(blocks[2], Block::Heading { level: 2, text: "second".to_string() });
	}

	#[test]
	fn keeps_checkbox_markers_literal() {
		let blocks = parse("- [ ] task");
		let Block::List(list) = &blocks[0] else { panic!("expected a list") };
		assert_eq!(render_paragraph(&list.items[0].text), "[ ] task");
	}

	#[test]
	fn nests_sub_lists_into_their_item() {
		let blocks = parse("- parent\n    - child\n- sibling");
		let Block::List(list) = &blocks[0] else { panic!("expected a list") };
		assert_eq!(list.items.len(), 2);
		let nested = list.items[0].nested.as_ref().expect("nested list");
		assert_eq!(nested.items.len(), 1);
		assert!(list.items[1].nested.is_none());
	}

	#[test]
	fn loose_items_parse_like_tight_ones() {
		let tight = parse("- one\n- two");
		let loose = parse("- one\n\n- two");
		assert_eq!(tight, loose);
	}

	#[test]
	fn keeps_numbered_list_start() {
		let blocks = parse("3. third\n4. fourth");
		let Block::List(list) = &blocks[0] else { panic!("expected a list") };
		assert_eq!(list.start, Some(3));
		assert_eq!(list.items.len(), 2);
	}

	#[test]
	fn inline_formatting_is_structured() {
		let blocks = parse("- plain `code` *emphasis* **strong**");
		let Block::List(list) = &blocks[0] else { panic!("expected a list") };
		let Paragraph(inlines) = &list.items[0].text;
		assert!(inlines.contains(&Inline::Code("code".to_string())));
		assert!(inlines.iter().any(|inline| matches!(inline, Inline::Emphasis(_))));
		assert!(inlines.iter().any(|inline| matches!(inline, Inline::Strong(_))));
	}

	#[test]
	fn rejects_top_level_prose() {
		let err = parse_document("just a paragraph", "test.md").unwrap_err();
		assert!(matches!(err, ParseError::UnexpectedBlock { .. }));
	}

	#[test]
	fn rejects_top_level_code_block() {
		let err = parse_document("```\ncode\n```", "test.md").unwrap_err();
		assert!(matches!(err, ParseError::UnexpectedBlock { .. }));
	}

	#[test]
	fn rejects_heading_with_formatting() {
		let err = parse_document("# has `code` inside", "test.md").unwrap_err();
		assert!(matches!(err, ParseError::HeadingShape { .. }));
	}

	#[test]
	fn rejects_links_in_items() {
		let err = parse_document("- see [docs](https://example.com)", "test.md").unwrap_err();
		assert!(matches!(err, ParseError::UnsupportedInline { .. }));
	}

	#[test]
	fn rejects_item_with_trailing_paragraph() {
		let err = parse_document("- parent\n    - child\n\n  trailing", "test.md").unwrap_err();
		assert!(matches!(err, ParseError::TrailingItemContent { .. }));
	}

	#[test]
	fn rejects_empty_item() {
		let err = parse_document("-\n- real", "test.md").unwrap_err();
		assert!(matches!(err, ParseError::MissingItemText { .. }));
	}
}
