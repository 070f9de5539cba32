//! Issue creation from extracted drafts.
//!
//! The default mode is a dry run: each issue that would be created is
//! described on the log instead, with placeholder numbers standing in for
//! the references written back into the document.

use color_eyre::eyre::Result;
use serde::Serialize;
use tracing::info;

use crate::{
	github::{BoxedGitHubClient, CreatedIssue, RepoRef},
	tasklist::IssueDraft,
};

/// Dry-run issue numbers count up from here, keeping placeholder references
/// visually distinct from real issue numbers.
const DRY_RUN_NUMBER_SEED: u64 = 10_000;

/// Outcome of generating a single issue.
#[derive(Clone, Debug)]
pub enum GeneratedIssue {
	Created(CreatedIssue),
	DryRun(DryRunIssue),
}

impl GeneratedIssue {
	/// The `#<number>` reference that replaces the checklist entry.
	pub fn reference(&self) -> String {
		match self {
			GeneratedIssue::Created(issue) => format!("#{}", issue.number),
			GeneratedIssue::DryRun(issue) => format!("#{}", issue.number),
		}
	}
}

/// Description of an issue that a dry run would have created.
#[derive(Clone, Debug, Serialize)]
pub struct DryRunIssue {
	pub repository: String,
	pub title: String,
	pub body: Option<String>,
	pub assignee: String,
	pub number: u64,
}

/// Creates one issue per draft and rewrites the source document.
pub struct IssueGenerator {
	client: BoxedGitHubClient,
	repo: RepoRef,
	assignee: String,
	dry_run: bool,
	title_prefix: Option<String>,
	dry_run_number: u64,
}

impl IssueGenerator {
	pub fn new(client: BoxedGitHubClient, repo: RepoRef, assignee: String, dry_run: bool, title_prefix: Option<String>) -> Self {
		Self {
			client,
			repo,
			assignee,
			dry_run,
			title_prefix,
			dry_run_number: DRY_RUN_NUMBER_SEED,
		}
	}

	/// Create (or describe) the issue for one draft.
	pub async fn generate(&mut self, draft: &IssueDraft) -> Result<GeneratedIssue> {
		if self.dry_run {
			self.dry_run_number += 1;
			let issue = DryRunIssue {
				repository: self.repo.to_string(),
				title: draft.title.clone(),
				body: draft.body.clone(),
				assignee: self.assignee.clone(),
				number: self.dry_run_number,
			};
			info!(issue = %serde_json::json!(&issue), "dry run: would create issue");
			return Ok(GeneratedIssue::DryRun(issue));
		}

		let created = self.client.create_issue(&self.repo, &draft.title, draft.body.as_deref(), &self.assignee).await?;
		info!(number = created.number, url = %created.html_url, "created issue");
		Ok(GeneratedIssue::Created(created))
	}

	/// Generate an issue for every draft, in document order, and replace
	/// each draft's source text with its issue reference.
	pub async fn apply(&mut self, document: &str, drafts: Vec<IssueDraft>) -> Result<String> {
		let mut document = document.to_string();
		for mut draft in drafts {
			if let Some(prefix) = &self.title_prefix {
				draft.prefix_title(prefix);
			}
			let generated = self.generate(&draft).await?;
			document = document.replacen(&draft.source_marker, &generated.reference(), 1);
		}
		Ok(document)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn references_use_the_issue_number() {
		let created = GeneratedIssue::Created(CreatedIssue {
			number: 42,
			html_url: "https://github.com/o/r/issues/42".to_string(),
		});
		assert_eq!(created.reference(), "#42");

		let dry = GeneratedIssue::DryRun(DryRunIssue {
			repository: "o/r".to_string(),
			title: "t".to_string(),
			body: None,
			assignee: "me".to_string(),
			number: 10_001,
		});
		assert_eq!(dry.reference(), "#10001");
	}
}
