use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use md2issues::{
	IssueGenerator,
	config::Settings,
	github::{self, BoxedGitHubClient, RepoRef},
	tasklist,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Turn a markdown checklist into Github issues.
///
/// Every unchecked `[ ] ` entry becomes an issue titled with its heading
/// context; the transformed document, with entries replaced by `#N`
/// references, is printed to stdout.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
	/// Github issue URL whose body holds the checklist (issues are created
	/// in that repository)
	#[arg(long, conflicts_with_all = ["issue_path", "repository"])]
	issue_url: Option<String>,

	/// Local markdown file holding the checklist (requires --repository)
	#[arg(long, requires = "repository")]
	issue_path: Option<PathBuf>,

	/// Repository URL to create issues in
	#[arg(long)]
	repository: Option<String>,

	/// Actually create issues; the default is a dry run that only describes them
	#[arg(long)]
	execute: bool,

	/// Prefix prepended to every generated issue title
	#[arg(long)]
	prefix: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let settings = Settings::load()?;
	let client = github::create_client(&settings);
	run(cli, client).await
}

async fn run(cli: Cli, client: BoxedGitHubClient) -> Result<()> {
	let (document, source_name, repo) = resolve_input(&cli, &client).await?;

	tasklist::check(&document, &source_name)?;
	let blocks = tasklist::parse_document(&document, &source_name)?;
	let drafts = tasklist::extract(&blocks);

	let assignee = client.fetch_authenticated_user().await?;
	let mut generator = IssueGenerator::new(client, repo, assignee, !cli.execute, cli.prefix);
	let transformed = generator.apply(&document, drafts).await?;
	println!("{transformed}");
	Ok(())
}

/// Resolve the checklist document and target repository from the CLI flags.
async fn resolve_input(cli: &Cli, client: &BoxedGitHubClient) -> Result<(String, String, RepoRef)> {
	match (&cli.issue_url, &cli.issue_path, &cli.repository) {
		(Some(url), None, None) => {
			let (repo, number) = github::parse_issue_url(url)?;
			let issue = client.fetch_issue(&repo, number).await?;
			info!(%repo, number, title = %issue.title, "fetched checklist issue");
			Ok((issue.body_text(), url.clone(), repo))
		}
		(None, Some(path), Some(repository)) => {
			let document = std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read checklist at {}", path.display()))?;
			let repo = github::parse_repo_url(repository)?;
			Ok((document, path.display().to_string(), repo))
		}
		_ => bail!("specify either --issue-url, or --issue-path together with --repository"),
	}
}
