//! End-to-end extraction: document text in, issue drafts out.

use md2issues::tasklist::{IssueDraft, check, extract, is_valid, parse_document};

const CHECKLIST: &str = "# hoge\n- [ ] po\n    - fu\n- [x] ke\n## huga\n- [ ] `kanye` to `ye`\n- surume";

#[test]
fn reference_checklist_yields_two_drafts() {
	assert!(is_valid(CHECKLIST));
	let blocks = parse_document(CHECKLIST, "issue body").unwrap();
	let drafts = extract(&blocks);
	assert_eq!(drafts, vec![
		IssueDraft {
			source_marker: "[ ] po".to_string(),
			title: "hoge - po".to_string(),
			body: Some("- fu".to_string()),
		},
		IssueDraft {
			source_marker: "[ ] `kanye` to `ye`".to_string(),
			title: "hoge - huga - `kanye` to `ye`".to_string(),
			body: None,
		},
	]);
}

#[test]
fn invalid_documents_are_rejected_before_parsing() {
	let document = "# ok\nplain prose here";
	assert!(!is_valid(document));
	assert!(check(document, "issue body").is_err());
}

#[test]
fn heading_context_spans_multiple_lists() {
	let document = "# release\n- [ ] tag\n\n## docs\n- [ ] changelog\n- [ ] announcement";
	let drafts = extract(&parse_document(document, "issue body").unwrap());
	let titles: Vec<&str> = drafts.iter().map(|draft| draft.title.as_str()).collect();
	assert_eq!(titles, ["release - tag", "release - docs - changelog", "release - docs - announcement"]);
}

#[test]
fn nested_checklists_extract_parent_first() {
	let document = "# plan\n- [ ] parent\n    - [ ] child\n    - note\n- [ ] sibling";
	let drafts = extract(&parse_document(document, "issue body").unwrap());
	let titles: Vec<&str> = drafts.iter().map(|draft| draft.title.as_str()).collect();
	assert_eq!(titles, ["plan - parent", "plan - child", "plan - sibling"]);
	assert!(drafts[0].body.is_some());
}
