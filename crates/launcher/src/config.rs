//! Launcher configuration.
//!
//! Settings are layered, highest priority first:
//!
//! 1. Command-line flags (`--root`, `--terminal`, `--editor`).
//! 2. `$XDG_CONFIG_HOME/workon/config.toml` (or the platform equivalent).
//! 3. The environment: `WORKON_ROOTS`, a `PATH`-style list of roots, or
//!    else every `GOPATH` entry's `src` directory.
//!
//! ```toml
//! roots = ["/home/me/go/src"]
//! terminal = "kitty"
//! editor = "gvim"
//! default_toolchain_version = "1.21"
//! placement = "strict"
//! ```
//!
//! The environment is read once into an [`EnvSnapshot`], so that nothing
//! below `main` looks at process state.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use workon_resolve::{PlacementPolicy, ResolverConfig};

use crate::cli::{Cli, DEFAULT_EDITOR, DEFAULT_TERMINAL};
use crate::error::ConfigError;

/// Process environment relevant to configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
	pub workon_roots: Option<OsString>,
	pub gopath: Option<OsString>,
	pub config_dir: Option<PathBuf>,
}

impl EnvSnapshot {
	/// Reads the current process environment.
	pub fn capture() -> Self {
		Self {
			workon_roots: std::env::var_os("WORKON_ROOTS"),
			gopath: std::env::var_os("GOPATH"),
			config_dir: dirs::config_dir(),
		}
	}

	/// Path of the configuration file, if a config directory is known.
	pub fn config_file(&self) -> Option<PathBuf> {
		self.config_dir.as_ref().map(|dir| dir.join("workon").join("config.toml"))
	}

	fn roots(&self) -> Vec<PathBuf> {
		if let Some(roots) = self.workon_roots.as_ref() {
			let roots = split_list(roots);
			if !roots.is_empty() {
				return roots;
			}
		}
		self.gopath
			.as_ref()
			.map(|gopath| split_list(gopath).into_iter().map(|dir| dir.join("src")).collect())
			.unwrap_or_default()
	}
}

fn split_list(value: &OsString) -> Vec<PathBuf> {
	std::env::split_paths(value).filter(|p| !p.as_os_str().is_empty()).collect()
}

/// Placement policy as spelled in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Placement {
	Strict,
	Lenient,
}

impl From<Placement> for PlacementPolicy {
	fn from(placement: Placement) -> Self {
		match placement {
			Placement::Strict => PlacementPolicy::Strict,
			Placement::Lenient => PlacementPolicy::Lenient,
		}
	}
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
	roots: Vec<PathBuf>,
	terminal: Option<String>,
	editor: Option<String>,
	default_toolchain_version: Option<String>,
	placement: Option<Placement>,
}

impl FileConfig {
	/// Reads `path`; a missing file is an empty configuration.
	pub fn read(path: &Path) -> Result<Self, ConfigError> {
		let text = match fs::read_to_string(path) {
			Ok(text) => text,
			Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
			Err(error) => {
				return Err(ConfigError::Io {
					path: path.to_path_buf(),
					error,
				});
			}
		};
		Self::parse(path, &text)
	}

	fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
		toml::from_str(text).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}
}

/// Fully layered configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub resolver: ResolverConfig,
	pub terminal: String,
	pub editor: String,
}

impl Config {
	/// Builds the configuration from flags, the config file and the environment.
	pub fn load(cli: &Cli, env: &EnvSnapshot) -> Result<Self, ConfigError> {
		let file = match env.config_file() {
			Some(path) => {
				let file = FileConfig::read(&path)?;
				tracing::debug!(path = %path.display(), "config.file.read");
				file
			}
			None => FileConfig::default(),
		};
		Self::layer(cli, file, env)
	}

	fn layer(cli: &Cli, file: FileConfig, env: &EnvSnapshot) -> Result<Self, ConfigError> {
		let roots = if !cli.roots.is_empty() {
			cli.roots.clone()
		} else if !file.roots.is_empty() {
			file.roots
		} else {
			env.roots()
		};
		if roots.is_empty() {
			return Err(ConfigError::NoRoots);
		}

		let mut resolver = ResolverConfig::new(roots);
		if let Some(version) = file.default_toolchain_version {
			resolver.default_toolchain_version = version;
		}
		if let Some(placement) = file.placement {
			resolver.placement = placement.into();
		}

		Ok(Self {
			resolver,
			terminal: cli
				.terminal
				.clone()
				.or(file.terminal)
				.unwrap_or_else(|| DEFAULT_TERMINAL.to_string()),
			editor: cli.editor.clone().or(file.editor).unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
		})
	}
}
