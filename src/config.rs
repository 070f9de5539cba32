//! Settings loading.
//!
//! The Github token comes from, in rising precedence: the
//! `GITHUB_ACCESS_TOKEN` environment variable, `config.toml` in the XDG
//! config directory, and `MD2ISSUES_`-prefixed environment variables.

use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use config::{Config, Environment, File};
use serde::Deserialize;

const APP_NAME: &str = "md2issues";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
	pub github_token: String,
}

impl Settings {
	pub fn load() -> Result<Self> {
		let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
		Self::load_from(xdg_dirs.find_config_file(CONFIG_FILE))
	}

	fn load_from(config_file: Option<PathBuf>) -> Result<Self> {
		let mut builder = Config::builder();
		if let Ok(token) = std::env::var("GITHUB_ACCESS_TOKEN") {
			builder = builder.set_default("github_token", token)?;
		}
		if let Some(path) = config_file {
			builder = builder.add_source(File::from(path));
		}
		let config = builder.add_source(Environment::with_prefix("MD2ISSUES")).build()?;
		config
			.try_deserialize()
			.wrap_err("Failed to assemble settings. A Github token is required: export GITHUB_ACCESS_TOKEN or set github_token in config.toml")
	}
}
