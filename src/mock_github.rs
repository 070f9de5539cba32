//! Mock Github client for testing purposes.
//!
//! Stores all state in memory so the generation pipeline can run without
//! touching the real API.

use std::{
	collections::HashMap,
	sync::{
		Mutex,
		atomic::{AtomicU64, Ordering},
	},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use tracing::instrument;

use crate::github::{CreatedIssue, GitHubClient, GitHubIssue, GitHubUser, RepoRef};

/// An issue recorded by the mock, either seeded or created through the trait.
#[derive(Clone, Debug)]
pub struct MockIssue {
	pub number: u64,
	pub title: String,
	pub body: Option<String>,
	pub assignee: Option<String>,
	pub author_login: String,
}

/// Key for looking up issues by owner/repo
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct RepoKey {
	owner: String,
	repo: String,
}

impl From<&RepoRef> for RepoKey {
	fn from(repo: &RepoRef) -> Self {
		Self {
			owner: repo.owner.clone(),
			repo: repo.repo.clone(),
		}
	}
}

/// Mock Github client that stores all state in memory.
/// Thread-safe for use in async contexts.
pub struct MockGitHubClient {
	/// The authenticated user's login
	user_login: String,

	/// Counter for generating unique issue numbers
	next_issue_number: AtomicU64,

	/// All issues, keyed by (owner, repo)
	issues: Mutex<HashMap<RepoKey, Vec<MockIssue>>>,

	/// Issues created through the trait, in creation order
	created: Mutex<Vec<(RepoRef, MockIssue)>>,
}

impl MockGitHubClient {
	/// Create a new mock client with the given authenticated user login
	pub fn new(user_login: &str) -> Self {
		Self {
			user_login: user_login.to_string(),
			next_issue_number: AtomicU64::new(1),
			issues: Mutex::new(HashMap::new()),
			created: Mutex::new(Vec::new()),
		}
	}

	/// Seed an existing issue so `fetch_issue` can find it.
	pub fn seed_issue(&self, repo: &RepoRef, number: u64, title: &str, body: &str) {
		let issue = MockIssue {
			number,
			title: title.to_string(),
			body: Some(body.to_string()),
			assignee: None,
			author_login: self.user_login.clone(),
		};
		self.issues.lock().unwrap().entry(repo.into()).or_default().push(issue);
		self.next_issue_number.fetch_max(number + 1, Ordering::SeqCst);
	}

	/// Issues created through the trait, in creation order.
	pub fn created_issues(&self) -> Vec<(RepoRef, MockIssue)> {
		self.created.lock().unwrap().clone()
	}
}

#[async_trait]
impl GitHubClient for MockGitHubClient {
	#[instrument(skip(self))]
	async fn fetch_authenticated_user(&self) -> Result<String> {
		Ok(self.user_login.clone())
	}

	#[instrument(skip(self))]
	async fn fetch_issue(&self, repo: &RepoRef, issue_number: u64) -> Result<GitHubIssue> {
		let key = RepoKey::from(repo);
		let issues = self.issues.lock().unwrap();
		let issue = issues
			.get(&key)
			.and_then(|repo_issues| repo_issues.iter().find(|issue| issue.number == issue_number))
			.ok_or_else(|| eyre!("no such issue: {repo}#{issue_number}"))?;
		Ok(GitHubIssue {
			number: issue.number,
			title: issue.title.clone(),
			body: issue.body.clone(),
			user: GitHubUser {
				login: issue.author_login.clone(),
			},
		})
	}

	#[instrument(skip(self, body))]
	async fn create_issue(&self, repo: &RepoRef, title: &str, body: Option<&str>, assignee: &str) -> Result<CreatedIssue> {
		let number = self.next_issue_number.fetch_add(1, Ordering::SeqCst);
		let issue = MockIssue {
			number,
			title: title.to_string(),
			body: body.map(str::to_string),
			assignee: Some(assignee.to_string()),
			author_login: self.user_login.clone(),
		};
		self.issues.lock().unwrap().entry(repo.into()).or_default().push(issue.clone());
		self.created.lock().unwrap().push((repo.clone(), issue));
		Ok(CreatedIssue {
			number,
			html_url: format!("https://github.com/{repo}/issues/{number}"),
		})
	}
}
