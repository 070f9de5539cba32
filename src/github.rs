//! Github API client.
//!
//! A trait seam keeps the remote side swappable: the real client talks to
//! api.github.com, while tests drive the same interface in memory.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use color_eyre::eyre::{Result, bail, eyre};
use reqwest::Client;
use serde::Deserialize;

use crate::config::Settings;

const USER_AGENT: &str = concat!("md2issues/", env!("CARGO_PKG_VERSION"));

/// A repository handle, displayed as `owner/repo`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoRef {
	pub owner: String,
	pub repo: String,
}

impl RepoRef {
	pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			repo: repo.into(),
		}
	}
}

impl fmt::Display for RepoRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.repo)
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct GitHubIssue {
	pub number: u64,
	pub title: String,
	pub body: Option<String>,
	pub user: GitHubUser,
}

impl GitHubIssue {
	/// Issue body with remote line endings normalized.
	pub fn body_text(&self) -> String {
		self.body.as_deref().unwrap_or_default().replace("\r\n", "\n")
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct GitHubUser {
	pub login: String,
}

/// Response from Github when creating an issue
#[derive(Clone, Debug, Deserialize)]
pub struct CreatedIssue {
	pub number: u64,
	pub html_url: String,
}

//==============================================================================
// Github Client Trait
//==============================================================================

/// Trait defining the Github operations this tool needs.
/// This allows for both real API calls and mock implementations for testing.
#[async_trait]
pub trait GitHubClient: Send + Sync {
	/// Fetch the authenticated user's login name
	async fn fetch_authenticated_user(&self) -> Result<String>;

	/// Fetch a single issue by number
	async fn fetch_issue(&self, repo: &RepoRef, issue_number: u64) -> Result<GitHubIssue>;

	/// Create a new issue assigned to `assignee`
	async fn create_issue(&self, repo: &RepoRef, title: &str, body: Option<&str>, assignee: &str) -> Result<CreatedIssue>;
}

//==============================================================================
// Real Github Client Implementation
//==============================================================================

/// Real Github API client that makes HTTP requests
pub struct RealGitHubClient {
	http_client: Client,
	github_token: String,
}

impl RealGitHubClient {
	pub fn new(settings: &Settings) -> Self {
		Self {
			http_client: Client::new(),
			github_token: settings.github_token.clone(),
		}
	}

	fn auth_header(&self) -> String {
		format!("token {}", self.github_token)
	}
}

#[async_trait]
impl GitHubClient for RealGitHubClient {
	async fn fetch_authenticated_user(&self) -> Result<String> {
		let res = self
			.http_client
			.get("https://api.github.com/user")
			.header("User-Agent", USER_AGENT)
			.header("Authorization", self.auth_header())
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to fetch authenticated user: {status} - {body}");
		}

		let user = res.json::<GitHubUser>().await?;
		Ok(user.login)
	}

	async fn fetch_issue(&self, repo: &RepoRef, issue_number: u64) -> Result<GitHubIssue> {
		let api_url = format!("https://api.github.com/repos/{repo}/issues/{issue_number}");

		let res = self
			.http_client
			.get(&api_url)
			.header("User-Agent", USER_AGENT)
			.header("Authorization", self.auth_header())
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to fetch issue: {status} - {body}");
		}

		let issue = res.json::<GitHubIssue>().await?;
		Ok(issue)
	}

	async fn create_issue(&self, repo: &RepoRef, title: &str, body: Option<&str>, assignee: &str) -> Result<CreatedIssue> {
		let api_url = format!("https://api.github.com/repos/{repo}/issues");

		let mut payload = serde_json::json!({ "title": title, "assignee": assignee });
		if let Some(body) = body {
			payload["body"] = serde_json::Value::String(body.to_string());
		}

		let res = self
			.http_client
			.post(&api_url)
			.header("User-Agent", USER_AGENT)
			.header("Authorization", self.auth_header())
			.header("Content-Type", "application/json")
			.json(&payload)
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to create issue: {status} - {body}");
		}

		let issue = res.json::<CreatedIssue>().await?;
		Ok(issue)
	}
}

//==============================================================================
// Convenience type alias for boxed client
//==============================================================================

pub type BoxedGitHubClient = Arc<dyn GitHubClient>;

/// Create a Github client from settings.
pub fn create_client(settings: &Settings) -> BoxedGitHubClient {
	Arc::new(RealGitHubClient::new(settings))
}

//==============================================================================
// URL parsing
//==============================================================================

/// Parse a Github issue URL into its repository and issue number.
/// Accepts `https://github.com/owner/repo/issues/123`, with or without the
/// protocol prefix.
pub fn parse_issue_url(url: &str) -> Result<(RepoRef, u64)> {
	let path = strip_github_prefix(url)?;
	let parts: Vec<&str> = path.split('/').collect();
	if parts.len() < 4 || parts[2] != "issues" {
		bail!("Invalid Github issue URL. Expected: https://github.com/owner/repo/issues/123, got: {url}");
	}
	let issue_number: u64 = parts[3].parse().map_err(|_| eyre!("Invalid issue number: {}", parts[3]))?;
	Ok((RepoRef::new(parts[0], parts[1]), issue_number))
}

/// Parse a Github repository URL into a [`RepoRef`].
pub fn parse_repo_url(url: &str) -> Result<RepoRef> {
	let path = strip_github_prefix(url)?;
	let mut parts = path.split('/').filter(|part| !part.is_empty());
	match (parts.next(), parts.next()) {
		(Some(owner), Some(repo)) => Ok(RepoRef::new(owner, repo.trim_end_matches(".git"))),
		_ => bail!("Invalid Github repository URL. Expected: https://github.com/owner/repo, got: {url}"),
	}
}

fn strip_github_prefix(url: &str) -> Result<&str> {
	let url = url.trim();
	let path = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")).unwrap_or(url);
	path.strip_prefix("github.com/").ok_or_else(|| eyre!("URL must be a Github URL: {url}"))
}
