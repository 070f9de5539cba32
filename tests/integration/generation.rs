//! Issue generation against the in-memory Github client.

use std::sync::Arc;

use md2issues::{
	IssueGenerator,
	github::RepoRef,
	mock_github::MockGitHubClient,
	tasklist::{extract, parse_document},
};

const DOCUMENT: &str = "# hoge\n- [ ] po\n- [x] ke\n## huga\n- [ ] kanye";

async fn rewrite(client: Arc<MockGitHubClient>, dry_run: bool, prefix: Option<String>) -> String {
	let repo = RepoRef::new("kasutera", "checklists");
	let blocks = parse_document(DOCUMENT, "test.md").unwrap();
	let drafts = extract(&blocks);
	let mut generator = IssueGenerator::new(client, repo, "kasutera".to_string(), dry_run, prefix);
	generator.apply(DOCUMENT, drafts).await.unwrap()
}

#[tokio::test]
async fn execute_mode_creates_issues_and_rewrites_references() {
	let client = Arc::new(MockGitHubClient::new("kasutera"));
	let rewritten = rewrite(client.clone(), false, None).await;
	insta::assert_snapshot!(rewritten, @"
	# hoge
	- #1
	- [x] ke
	## huga
	- #2
	");

	let created = client.created_issues();
	assert_eq!(created.len(), 2);
	assert_eq!(created[0].0, RepoRef::new("kasutera", "checklists"));
	assert_eq!(created[0].1.title, "hoge - po");
	assert_eq!(created[0].1.assignee.as_deref(), Some("kasutera"));
	assert_eq!(created[1].1.title, "hoge - huga - kanye");
}

#[tokio::test]
async fn dry_run_describes_without_creating() {
	let client = Arc::new(MockGitHubClient::new("kasutera"));
	let rewritten = rewrite(client.clone(), true, None).await;
	insta::assert_snapshot!(rewritten, @"
	# hoge
	- #10001
	- [x] ke
	## huga
	- #10002
	");

	assert!(client.created_issues().is_empty());
}

#[tokio::test]
async fn title_prefix_applies_to_every_issue() {
	let client = Arc::new(MockGitHubClient::new("kasutera"));
	rewrite(client.clone(), false, Some("[sprint] ".to_string())).await;
	let created = client.created_issues();
	assert_eq!(created[0].1.title, "[sprint] hoge - po");
	assert_eq!(created[1].1.title, "[sprint] hoge - huga - kanye");
}

#[tokio::test]
async fn bodies_come_from_nested_lists() {
	let client = Arc::new(MockGitHubClient::new("kasutera"));
	let document = "# hoge\n- [ ] po\n    - fu";
	let drafts = extract(&parse_document(document, "test.md").unwrap());
	let mut generator = IssueGenerator::new(client.clone(), RepoRef::new("o", "r"), "kasutera".to_string(), false, None);
	let rewritten = generator.apply(document, drafts).await.unwrap();
	assert_eq!(rewritten, "# hoge\n- #1\n    - fu");

	let created = client.created_issues();
	assert_eq!(created[0].1.body.as_deref(), Some("- fu"));
}

#[tokio::test]
async fn fetched_issue_bodies_parse_after_normalization() {
	let client = Arc::new(MockGitHubClient::new("kasutera"));
	let repo = RepoRef::new("kasutera", "checklists");
	client.seed_issue(&repo, 7, "weekly checklist", "# plan\r\n- [ ] ship");

	let issue = client.fetch_issue(&repo, 7).await.unwrap();
	let document = issue.body_text();
	let drafts = extract(&parse_document(&document, "issue body").unwrap());
	assert_eq!(drafts.len(), 1);
	assert_eq!(drafts[0].title, "plan - ship");
}

#[tokio::test]
async fn duplicate_entries_each_get_their_own_issue() {
	let client = Arc::new(MockGitHubClient::new("kasutera"));
	let document = "- [ ] fix ci\n- [ ] fix ci";
	let drafts = extract(&parse_document(document, "test.md").unwrap());
	let mut generator = IssueGenerator::new(client.clone(), RepoRef::new("o", "r"), "kasutera".to_string(), false, None);
	let rewritten = generator.apply(document, drafts).await.unwrap();
	assert_eq!(rewritten, "- #1\n- #2");
	assert_eq!(client.created_issues().len(), 2);
}
